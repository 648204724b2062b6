use aci_tree_core::{NodePath, NodePathParseError, Selector};
use serde::Deserialize;

/// A selection as written on the command line or in a batch plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SelectionSpec {
    /// Positions among the tenant's children (or every object with `deep`).
    pub positions: Vec<usize>,
    /// Explicit object paths such as `0.5.2`.
    pub paths: Vec<String>,
    /// Class name; narrows positions/paths, selects on its own otherwise.
    pub class: Option<String>,
    /// Values of the `name` attribute to keep.
    pub names: Vec<String>,
    /// Count positions over every depth.
    pub deep: bool,
}

impl SelectionSpec {
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
            && self.paths.is_empty()
            && self.class.as_deref().map_or(true, |c| c.trim().is_empty())
            && self.names.iter().all(|n| n.trim().is_empty())
    }

    /// Build the core [`Selector`].
    pub fn to_selector(&self) -> Result<Selector, NodePathParseError> {
        let paths = self
            .paths
            .iter()
            .map(|p| p.parse::<NodePath>())
            .collect::<Result<Vec<_>, _>>()?;

        let mut selector = Selector::positions(self.positions.iter().copied()).with_paths(paths);
        if let Some(class) = self.class.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            selector = selector.with_class(class);
        }
        let names: Vec<&str> = self
            .names
            .iter()
            .map(|n| n.trim())
            .filter(|n| !n.is_empty())
            .collect();
        if !names.is_empty() {
            selector = selector.with_names(names);
        }
        if self.deep {
            selector = selector.deep();
        }
        Ok(selector)
    }

    /// Short human description used in log lines and reports.
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if !self.positions.is_empty() {
            let joined: Vec<String> = self.positions.iter().map(ToString::to_string).collect();
            parts.push(format!("positions={}", joined.join(",")));
        }
        if !self.paths.is_empty() {
            parts.push(format!("paths={}", self.paths.join(",")));
        }
        if let Some(class) = &self.class {
            parts.push(format!("class={class}"));
        }
        if !self.names.is_empty() {
            parts.push(format!("names={}", self.names.join(",")));
        }
        if self.deep {
            parts.push("deep".to_string());
        }
        if parts.is_empty() {
            "nothing".to_string()
        } else {
            parts.join(" ")
        }
    }
}
