//! Shared fixtures for the behaviour scenarios.

use std::collections::BTreeMap;

use anyhow::{Result, anyhow};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use test_helpers::Zoo;
use translucent::Object;

/// State shared between the steps of one scenario.
#[derive(Default, ScenarioState)]
pub struct ZooContext {
    pub zoo: Slot<Zoo>,
    pub objects: Slot<BTreeMap<String, Object>>,
    pub last_error: Slot<String>,
}

impl ZooContext {
    /// Run `f` against the zoo and its named objects, restoring both
    /// afterwards even when `f` fails.
    pub fn with_zoo<R>(
        &self,
        f: impl FnOnce(&mut Zoo, &mut BTreeMap<String, Object>) -> Result<R>,
    ) -> Result<R> {
        let mut zoo = self
            .zoo
            .take()
            .ok_or_else(|| anyhow!("the sample zoo has not been built"))?;
        let mut objects = self.objects.take().unwrap_or_default();
        let result = f(&mut zoo, &mut objects);
        self.zoo.set(zoo);
        self.objects.set(objects);
        result
    }
}

/// Creates an empty scenario state.
#[fixture]
pub fn zoo_context() -> ZooContext {
    ZooContext::default()
}
