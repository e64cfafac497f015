//! Binds the feature files to the shared fixtures.

use rstest_bdd_macros::scenarios;

use super::fixtures::{ZooContext, zoo_context};

scenarios!(
    "tests/features/translucency.feature",
    fixtures = [zoo_context: ZooContext]
);
scenarios!(
    "tests/features/access_tiers.feature",
    fixtures = [zoo_context: ZooContext]
);
