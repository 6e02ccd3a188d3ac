//! Key casing policies applied to emitted field names
//!
//! Every attribute, relationship, and link name the serializer emits runs
//! through exactly one of these policies. Structural keys (`id`, `type`,
//! `attributes`, `relationships`, `data`, `included`, `meta`, `links`) are
//! never transformed.

/// Casing policy for output keys
///
/// Source field names are expected in `snake_case`; each policy maps them
/// to the corresponding output convention. All four policies are
/// idempotent, so re-applying a policy to an already-transformed key is a
/// no-op.
///
/// # Examples
///
/// ```
/// use jsonapi_serializer::KeyTransform;
///
/// assert_eq!(KeyTransform::Underscore.apply("release_year"), "release_year");
/// assert_eq!(KeyTransform::Dash.apply("release_year"), "release-year");
/// assert_eq!(KeyTransform::Camel.apply("release_year"), "ReleaseYear");
/// assert_eq!(KeyTransform::CamelLower.apply("release_year"), "releaseYear");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyTransform {
	/// Identity; output matches the source naming convention
	#[default]
	Underscore,
	/// `release_year` becomes `release-year`
	Dash,
	/// `release_year` becomes `ReleaseYear`
	Camel,
	/// `release_year` becomes `releaseYear`
	CamelLower,
}

impl KeyTransform {
	/// Transform a single field name under this policy
	pub fn apply(&self, key: &str) -> String {
		match self {
			Self::Underscore => key.to_string(),
			Self::Dash => key.replace('_', "-"),
			Self::Camel => camelize(key, true),
			Self::CamelLower => camelize(key, false),
		}
	}
}

// Only the first character of each segment changes case; the rest is kept
// as-is, which makes repeated application a no-op.
fn camelize(key: &str, upper_first: bool) -> String {
	let mut out = String::with_capacity(key.len());
	for (i, segment) in key.split('_').filter(|s| !s.is_empty()).enumerate() {
		let mut chars = segment.chars();
		if let Some(first) = chars.next() {
			if i > 0 || upper_first {
				out.extend(first.to_uppercase());
			} else {
				out.extend(first.to_lowercase());
			}
			out.push_str(chars.as_str());
		}
	}
	out
}
