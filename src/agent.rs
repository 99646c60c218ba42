//! Agent combinators - composing single-input single-output transformations
//!
//! An [`Agent`] turns one input into one output. Any `FnMut(I) -> O` closure
//! is an agent, and so are the views returned by `as_agent` on the circuit
//! primitives.
//!
//! Combinators never mutate the agents they wrap beyond calling `process`;
//! each returns a new agent value that owns its parts:
//!
//! | combinator | result computes |
//! |---|---|
//! | [`transform`] | `f(a(x))` |
//! | [`filter`] | `Some(a(x))` if `p(&a(x))`, else `None` |
//! | [`pipeline`] | `b(a(x))` |
//! | [`parallel`] | `combine(a(x), b(x))` |
//! | [`shift_register`] | `sN(..s1(initial(x)))` |
//! | [`feedback`] | `a(a(..a(x)))`, `n` times |
//!
//! Two agents only share state when the caller closes both over the same
//! cell or buffer.

/// A single-input single-output transformation.
pub trait Agent<I> {
    type Output;

    fn process(&mut self, input: I) -> Self::Output;

    /// See [`transform`].
    fn map<F, O>(self, f: F) -> Transform<Self, F>
    where
        Self: Sized,
        F: FnMut(Self::Output) -> O,
    {
        Transform { agent: self, f }
    }

    /// See [`filter`].
    fn filter<P>(self, predicate: P) -> Filter<Self, P>
    where
        Self: Sized,
        P: FnMut(&Self::Output) -> bool,
    {
        Filter {
            agent: self,
            predicate,
        }
    }

    /// See [`pipeline`].
    fn then<B>(self, next: B) -> Pipeline<Self, B>
    where
        Self: Sized,
        B: Agent<Self::Output>,
    {
        Pipeline {
            first: self,
            second: next,
        }
    }
}

impl<I, O, F> Agent<I> for F
where
    F: FnMut(I) -> O,
{
    type Output = O;

    #[inline]
    fn process(&mut self, input: I) -> O {
        (*self)(input)
    }
}

// =========================================================================
// IDENTITY
// =========================================================================

/// Returns its input unchanged. Unit of [`pipeline`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Identity;

pub fn identity() -> Identity {
    Identity
}

impl<T> Agent<T> for Identity {
    type Output = T;

    #[inline]
    fn process(&mut self, input: T) -> T {
        input
    }
}

// =========================================================================
// TRANSFORM / FILTER
// =========================================================================

/// Output-side map. See [`transform`].
#[derive(Clone, Debug)]
pub struct Transform<A, F> {
    agent: A,
    f: F,
}

/// Map the output of `agent` through `f`.
pub fn transform<I, O, A, F>(agent: A, f: F) -> Transform<A, F>
where
    A: Agent<I>,
    F: FnMut(A::Output) -> O,
{
    Transform { agent, f }
}

impl<I, O, A, F> Agent<I> for Transform<A, F>
where
    A: Agent<I>,
    F: FnMut(A::Output) -> O,
{
    type Output = O;

    fn process(&mut self, input: I) -> O {
        (self.f)(self.agent.process(input))
    }
}

/// Conditional pass-through. See [`filter`].
#[derive(Clone, Debug)]
pub struct Filter<A, P> {
    agent: A,
    predicate: P,
}

/// Pass `agent`'s output through only when `predicate` holds.
pub fn filter<I, A, P>(agent: A, predicate: P) -> Filter<A, P>
where
    A: Agent<I>,
    P: FnMut(&A::Output) -> bool,
{
    Filter { agent, predicate }
}

impl<I, A, P> Agent<I> for Filter<A, P>
where
    A: Agent<I>,
    P: FnMut(&A::Output) -> bool,
{
    type Output = Option<A::Output>;

    fn process(&mut self, input: I) -> Self::Output {
        let out = self.agent.process(input);
        if (self.predicate)(&out) {
            Some(out)
        } else {
            None
        }
    }
}

// =========================================================================
// PIPELINE / PARALLEL
// =========================================================================

/// Sequential composition. See [`pipeline`].
#[derive(Clone, Debug)]
pub struct Pipeline<A, B> {
    first: A,
    second: B,
}

/// Feed `first`'s output into `second`.
pub fn pipeline<I, A, B>(first: A, second: B) -> Pipeline<A, B>
where
    A: Agent<I>,
    B: Agent<A::Output>,
{
    Pipeline { first, second }
}

impl<I, A, B> Agent<I> for Pipeline<A, B>
where
    A: Agent<I>,
    B: Agent<A::Output>,
{
    type Output = B::Output;

    fn process(&mut self, input: I) -> Self::Output {
        let mid = self.first.process(input);
        self.second.process(mid)
    }
}

/// Fan-out and merge. See [`parallel`].
#[derive(Clone, Debug)]
pub struct Parallel<A, B, C> {
    left: A,
    right: B,
    combine: C,
}

/// Run both agents on the same input and merge their outputs.
///
/// `left` runs first, on a clone of the input.
pub fn parallel<I, O, A, B, C>(left: A, right: B, combine: C) -> Parallel<A, B, C>
where
    I: Clone,
    A: Agent<I>,
    B: Agent<I>,
    C: FnMut(A::Output, B::Output) -> O,
{
    Parallel {
        left,
        right,
        combine,
    }
}

impl<I, O, A, B, C> Agent<I> for Parallel<A, B, C>
where
    I: Clone,
    A: Agent<I>,
    B: Agent<I>,
    C: FnMut(A::Output, B::Output) -> O,
{
    type Output = O;

    fn process(&mut self, input: I) -> O {
        let a = self.left.process(input.clone());
        let b = self.right.process(input);
        (self.combine)(a, b)
    }
}

// =========================================================================
// SHIFT REGISTER / FEEDBACK
// =========================================================================

/// Initial agent followed by a chain of stages. See [`shift_register`].
#[derive(Clone, Debug)]
pub struct StageChain<A, S> {
    initial: A,
    stages: Vec<S>,
}

/// Run `initial`, then thread its output through `stages` left to right.
///
/// Not to be confused with [`ShiftRegister`](crate::ShiftRegister), the
/// storage primitive.
pub fn shift_register<I, A, S>(initial: A, stages: Vec<S>) -> StageChain<A, S>
where
    A: Agent<I>,
    S: Agent<A::Output, Output = A::Output>,
{
    StageChain { initial, stages }
}

impl<A, S> StageChain<A, S> {
    pub fn stages(&self) -> usize {
        self.stages.len()
    }
}

impl<I, A, S> Agent<I> for StageChain<A, S>
where
    A: Agent<I>,
    S: Agent<A::Output, Output = A::Output>,
{
    type Output = A::Output;

    fn process(&mut self, input: I) -> Self::Output {
        let seed = self.initial.process(input);
        self.stages
            .iter_mut()
            .fold(seed, |value, stage| stage.process(value))
    }
}

/// Repeated self-application. See [`feedback`].
#[derive(Clone, Debug)]
pub struct Feedback<A> {
    agent: A,
    iterations: usize,
}

/// Apply `agent` to its own output `iterations` times. Zero is identity.
pub fn feedback<T, A>(agent: A, iterations: usize) -> Feedback<A>
where
    A: Agent<T, Output = T>,
{
    Feedback { agent, iterations }
}

impl<A> Feedback<A> {
    pub fn iterations(&self) -> usize {
        self.iterations
    }
}

impl<T, A> Agent<T> for Feedback<A>
where
    A: Agent<T, Output = T>,
{
    type Output = T;

    fn process(&mut self, input: T) -> T {
        let mut value = input;
        for _ in 0..self.iterations {
            value = self.agent.process(value);
        }
        value
    }
}
