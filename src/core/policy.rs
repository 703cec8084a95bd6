//! Purpose: Immutable serialization profiles and per-call options.
//! Exports: `JsonPolicy`, `TypeNameHandling`, `AssemblyStyle`, `CycleHandling`,
//! `Formatting`, `WriteOptions`, `ReadOptions`.
//! Role: The only knob set for encode/decode; built per call and passed by reference.
//! Invariants: No process-wide policy exists; changing one caller's policy never
//! affects another caller.
//! Invariants: A document must be read with the same `type_names` setting it was written with.
use serde::{Deserialize, Serialize};

/// Whether type identity is embedded in the document.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypeNameHandling {
    #[default]
    None,
    All,
}

/// How a root type identity is rendered when type names are embedded.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssemblyStyle {
    /// Last path segment of each type plus the owning crate.
    #[default]
    Simple,
    /// Fully qualified path plus the owning crate.
    Full,
}

/// What to do when a `Shared` node is reached again through its own descendants.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CycleHandling {
    #[default]
    Error,
    Ignore,
    Duplicate,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Formatting {
    Compact,
    #[default]
    Indented,
}

impl Formatting {
    pub fn from_indent(indent: bool) -> Self {
        if indent {
            Formatting::Indented
        } else {
            Formatting::Compact
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct JsonPolicy {
    pub type_names: TypeNameHandling,
    pub assembly_style: AssemblyStyle,
    pub cycles: CycleHandling,
    pub format: Formatting,
}

impl JsonPolicy {
    /// Plain JSON matching the shape of the payload.
    pub fn plain() -> Self {
        Self::default()
    }

    /// Embeds type identity on every object, simple assembly style.
    pub fn tagged_writer() -> Self {
        Self {
            type_names: TypeNameHandling::All,
            assembly_style: AssemblyStyle::Simple,
            ..Self::default()
        }
    }

    /// Counterpart of `tagged_writer` for decoding.
    pub fn tagged_reader() -> Self {
        Self {
            type_names: TypeNameHandling::All,
            assembly_style: AssemblyStyle::Simple,
            ..Self::default()
        }
    }

    /// Cycle-tolerant plain output for graph payloads; always indented.
    pub fn tree() -> Self {
        Self {
            cycles: CycleHandling::Duplicate,
            format: Formatting::Indented,
            ..Self::default()
        }
    }

    pub fn with_format(mut self, format: Formatting) -> Self {
        self.format = format;
        self
    }

    pub fn with_indent(self, indent: bool) -> Self {
        self.with_format(Formatting::from_indent(indent))
    }

    pub fn with_cycles(mut self, cycles: CycleHandling) -> Self {
        self.cycles = cycles;
        self
    }

    pub fn with_assembly_style(mut self, assembly_style: AssemblyStyle) -> Self {
        self.assembly_style = assembly_style;
        self
    }

    pub fn is_tagged(&self) -> bool {
        self.type_names == TypeNameHandling::All
    }

    pub(crate) fn dialect(&self) -> &'static str {
        match (self.type_names, self.cycles) {
            (TypeNameHandling::All, _) => "tagged",
            (TypeNameHandling::None, CycleHandling::Error) => "plain",
            (TypeNameHandling::None, _) => "tree",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WriteOptions {
    pub create_if_missing: bool,
    pub indent: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            create_if_missing: true,
            indent: true,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ReadOptions {
    pub use_type_tags: bool,
}

impl ReadOptions {
    pub(crate) fn policy(&self) -> JsonPolicy {
        if self.use_type_tags {
            JsonPolicy::tagged_reader()
        } else {
            JsonPolicy::plain()
        }
    }
}
