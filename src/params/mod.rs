//! Template input parameters: per-cloud default tables and scenario resolution

pub mod defaults;
pub mod resolve;

use std::collections::BTreeMap;

/// Flat `input_*` option name to value mapping, serialized as a JSON object
pub type Params = BTreeMap<String, String>;

pub use defaults::{DEFAULT_ROOT_DIR, TEST_PROJECT_NAME, defaults_for, expected_generator_defaults};
pub use resolve::{merge, prepare_context, resolve, scenario_params, select_defaults};
