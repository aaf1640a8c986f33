//! Vertical offset policy.
//!
//! Party parrot artwork is not consistently framed: some sets sit low in their
//! canvas, some already fill it. Each base set name falls into one bucket
//! which decides how far the drawn frame is lifted inside the icon canvas.
//!
//! The buckets are read once from the bundled `Offsets.json`:
//!
//! ```json
//! {
//!   "noYOffsetFiles": ["ultrafastparrot"],
//!   "reducedYOffsetFiles": ["fiestaparrot"],
//!   "extraYOffsetFiles": ["dealwithitparrot"]
//! }
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::assets::{AssetKind, ResourceProvider};
use crate::constants::OFFSETS_RESOURCE;

/// Vertical alignment bucket of a set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OffsetClass {
    None,
    Reduced,
    Extra,
    Default,
}

impl OffsetClass {
    /// Upward shift in canvas pixels.
    #[must_use]
    pub const fn shift(self) -> f32 {
        match self {
            Self::None => 0.0,
            Self::Reduced => 1.6,
            Self::Default => 2.8,
            Self::Extra => 4.0,
        }
    }
}

impl std::fmt::Display for OffsetClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::None => "none",
            Self::Reduced => "reduced",
            Self::Extra => "extra",
            Self::Default => "default",
        };
        f.write_str(label)
    }
}

/// On-disk shape of `Offsets.json`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct OffsetLists {
    no_y_offset_files: Vec<String>,
    reduced_y_offset_files: Vec<String>,
    extra_y_offset_files: Vec<String>,
}

/// Strips the trailing frame index from a frame or set name.
///
/// `parrot10` becomes `parrot`; names without a trailing number are returned as is.
#[must_use]
pub fn base_name(name: &str) -> &str { name.trim_end_matches(|c: char| c.is_ascii_digit()) }

/// Classifies base set names into [`OffsetClass`] buckets.
#[derive(Debug, Clone, Default)]
pub struct OffsetPolicy {
    no_offset: HashSet<String>,
    reduced_offset: HashSet<String>,
    extra_offset: HashSet<String>,
}

impl OffsetPolicy {
    /// Builds a policy from explicit name lists.
    pub fn new<I, S>(no_offset: I, reduced_offset: I, extra_offset: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            no_offset: no_offset.into_iter().map(Into::into).collect(),
            reduced_offset: reduced_offset.into_iter().map(Into::into).collect(),
            extra_offset: extra_offset.into_iter().map(Into::into).collect(),
        }
    }

    /// Parses the offsets configuration. Comments are allowed.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a JSON object of name lists.
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        let reader = json_comments::StripComments::new(bytes);
        let lists: OffsetLists = serde_json::from_reader(reader)?;

        Ok(Self::new(
            lists.no_y_offset_files,
            lists.reduced_y_offset_files,
            lists.extra_y_offset_files,
        ))
    }

    /// Loads the policy from the bundle's offsets resource.
    ///
    /// A missing or malformed resource yields an empty policy, under which every
    /// name classifies as [`OffsetClass::Default`].
    pub fn load(provider: &dyn ResourceProvider) -> Self {
        let Some(bytes) = provider.lookup(OFFSETS_RESOURCE, AssetKind::Data) else {
            tracing::warn!(resource = OFFSETS_RESOURCE, "offsets file not found, using defaults");
            return Self::default();
        };

        match Self::from_json(&bytes) {
            Ok(policy) => {
                tracing::debug!(
                    none = policy.no_offset.len(),
                    reduced = policy.reduced_offset.len(),
                    extra = policy.extra_offset.len(),
                    "offsets loaded"
                );
                policy
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to parse offsets file, using defaults");
                Self::default()
            }
        }
    }

    /// Classifies a base name. First match wins: none, extra, reduced, default.
    #[must_use]
    pub fn classify(&self, base_name: &str) -> OffsetClass {
        if self.no_offset.contains(base_name) {
            OffsetClass::None
        } else if self.extra_offset.contains(base_name) {
            OffsetClass::Extra
        } else if self.reduced_offset.contains(base_name) {
            OffsetClass::Reduced
        } else {
            OffsetClass::Default
        }
    }

    /// Upward shift for a frame or set name, after stripping its frame index.
    #[must_use]
    pub fn shift_for(&self, name: &str) -> f32 { self.classify(base_name(name)).shift() }

    /// Returns `true` when no names are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.no_offset.is_empty() && self.reduced_offset.is_empty() && self.extra_offset.is_empty()
    }
}
