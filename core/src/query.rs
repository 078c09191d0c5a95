//! Applying compiled rules to record sources.
//!
//! A [`QuerySource`] reports which [`Constructs`] it evaluates natively. [`apply`] compiles the rule once and pushes
//! the predicate down when the source can handle every construct it uses; otherwise it materializes the source and
//! filters in process. Both paths yield the same records.

use ruleql::RuleNode;
use tracing::debug;

use crate::compile::compile;
use crate::error::BuildError;
use crate::options::BuildOptions;
use crate::predicate::{Constructs, Predicate};
use crate::record::Record;

pub trait QuerySource: Sized {
    type Record: Record;
    /// Records the source filters itself, evaluated lazily
    type Deferred: Iterator<Item = Self::Record>;
    type Local: IntoIterator<Item = Self::Record>;

    fn capabilities(&self) -> Constructs;

    /// Hand the predicate to the source. Only called with predicates within [`QuerySource::capabilities`].
    fn query(self, predicate: Predicate) -> Self::Deferred;

    /// Fetch every record for local filtering
    fn materialize(self) -> Self::Local;
}

/// Output of [`apply`]
pub enum Filtered<S: QuerySource> {
    Deferred(S::Deferred),
    Local(FilteredStream<<S::Local as IntoIterator>::IntoIter>),
}

impl<S: QuerySource> Filtered<S> {
    pub fn is_deferred(&self) -> bool { matches!(self, Filtered::Deferred(_)) }
}

impl<S: QuerySource> Iterator for Filtered<S> {
    type Item = S::Record;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Filtered::Deferred(inner) => inner.next(),
            Filtered::Local(inner) => inner.next(),
        }
    }
}

/// Compile `rule` for the source's record type and filter the source with it. `None` means no filter.
pub fn apply<S: QuerySource>(rule: Option<&RuleNode>, source: S, options: &BuildOptions) -> Result<Filtered<S>, BuildError> {
    let predicate = compile_optional::<S::Record>(rule, options)?;
    let needed = predicate.constructs();
    let capabilities = source.capabilities();

    if capabilities.contains(needed) {
        debug!(constructs = ?needed, "pushing predicate down to source");
        Ok(Filtered::Deferred(source.query(predicate)))
    } else {
        debug!(missing = ?needed.difference(capabilities), "source cannot evaluate predicate, filtering locally");
        Ok(Filtered::Local(FilteredStream::new(source.materialize().into_iter(), predicate)))
    }
}

fn compile_optional<R: Record>(rule: Option<&RuleNode>, options: &BuildOptions) -> Result<Predicate, BuildError> {
    match rule {
        Some(rule) => compile::<R>(rule, options),
        None => Ok(Predicate::True),
    }
}

/// Passes through the records matching a predicate
pub struct FilteredStream<I> {
    pub inner: I,
    pub predicate: Predicate,
}

impl<I> FilteredStream<I> {
    pub fn new(inner: I, predicate: Predicate) -> Self { Self { inner, predicate } }
}

impl<I> Iterator for FilteredStream<I>
where
    I: Iterator,
    I::Item: Record,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let item = self.inner.next()?;
            if self.predicate.evaluate(&item) {
                return Some(item);
            }
        }
    }
}

/// In-memory records evaluate nothing natively; everything is filtered in process
impl<R: Record> QuerySource for Vec<R> {
    type Record = R;
    type Deferred = FilteredStream<std::vec::IntoIter<R>>;
    type Local = Vec<R>;

    fn capabilities(&self) -> Constructs { Constructs::empty() }
    fn query(self, predicate: Predicate) -> Self::Deferred { FilteredStream::new(self.into_iter(), predicate) }
    fn materialize(self) -> Self::Local { self }
}

/// Filtering for any iterator of records
pub trait RecordStreamExt: Iterator + Sized
where Self::Item: Record
{
    fn filter_predicate(self, predicate: Predicate) -> FilteredStream<Self> { FilteredStream::new(self, predicate) }

    /// Compile `rule` for the item type and filter with it. `None` passes everything through.
    fn filter_rule(self, rule: Option<&RuleNode>, options: &BuildOptions) -> Result<FilteredStream<Self>, BuildError> {
        Ok(self.filter_predicate(compile_optional::<Self::Item>(rule, options)?))
    }
}

impl<I> RecordStreamExt for I
where
    I: Iterator,
    I::Item: Record,
{
}
