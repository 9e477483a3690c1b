//! Utilities used in tests in multiple crates within the workspace.

use std::{
    fmt::{Debug, Display},
    marker::PhantomData,
};

use anyhow::Result;
use googletest::{
    description::Description,
    matcher::{Matcher, MatcherBase, MatcherResult},
};

/// Creates a matcher against an `anyhow::Error` that downcasts to the error type `E` and matches
/// the inner matcher against the downcast value.
pub fn anyhow_downcasts_to<E, M>(inner: M) -> AnyhowDowncastTo<E, M> {
    AnyhowDowncastTo::<E, M> {
        inner,
        phantom_e: PhantomData,
    }
}

pub struct AnyhowDowncastTo<E, M> {
    inner: M,
    phantom_e: PhantomData<E>,
}

impl<E, M> AnyhowDowncastTo<E, M> {
    fn type_name() -> &'static str {
        std::any::type_name::<E>()
    }
}

impl<E, M> MatcherBase for AnyhowDowncastTo<E, M> {}

impl<E, M> Matcher<&anyhow::Error> for AnyhowDowncastTo<E, M>
where
    E: Copy + Display + Debug + Send + Sync + 'static,
    M: Matcher<E>,
{
    fn matches(&self, actual: &anyhow::Error) -> MatcherResult {
        match actual.downcast_ref::<E>() {
            Some(e) => self.inner.matches(*e),
            None => MatcherResult::NoMatch,
        }
    }

    fn explain_match(&self, actual: &anyhow::Error) -> Description {
        let Some(e) = actual.downcast_ref::<E>() else {
            return Description::new().text(format!(
                "which does not downcast to {}",
                Self::type_name()
            ));
        };
        Description::new()
            .text(format!("which downcasts to {}", Self::type_name()))
            .nested(self.inner.explain_match(*e))
    }

    fn describe(&self, matcher_result: MatcherResult) -> Description {
        let verb = match matcher_result {
            MatcherResult::Match => "downcasts",
            MatcherResult::NoMatch => "does not downcast",
        };
        format!(
            "{verb} to {} with a value which {}",
            Self::type_name(),
            self.inner.describe(MatcherResult::Match)
        )
        .into()
    }
}

/// Parses CSV text that has no header handling applied, returning every record as a vector of
/// fields. Useful for asserting on exported CSV without depending on exact quoting.
pub fn csv_records(text: &str) -> Result<Vec<Vec<String>>> {
    let records = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes())
        .records()
        .map(|record_result| {
            record_result.map(|record| record.iter().map(str::to_string).collect::<Vec<String>>())
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(records)
}

/// Shorthand for building an owned row of strings in test expectations.
pub fn strings<const N: usize>(values: [&str; N]) -> Vec<String> {
    values.into_iter().map(str::to_string).collect()
}
