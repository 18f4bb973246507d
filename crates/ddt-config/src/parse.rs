//! Document parsing settings.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ParseSettings {
    /// Methods with these names are left out of the class model.
    #[serde(default)]
    pub method_names_to_ignore: Vec<String>,
}
