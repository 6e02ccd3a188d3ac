//! Include-path parsing and lookup
//!
//! Client-requested include paths (`"comments.author"`) are normalized
//! into a prefix tree before traversal. Segments that do not name a
//! declared relationship are simply never looked up, so unknown paths are
//! tolerated rather than rejected.

use std::collections::HashMap;

/// Prefix tree of requested include paths
///
/// Each node's children are the relationship names requested one level
/// deeper. Duplicate and overlapping paths collapse into a single branch,
/// so `["comments", "comments.author"]` produces one `comments` node with
/// an `author` child.
///
/// # Examples
///
/// ```
/// use jsonapi_serializer::IncludeTree;
///
/// let tree = IncludeTree::parse(["comments.author", "tags"]);
/// assert!(tree.contains("comments"));
/// assert!(tree.contains("tags"));
/// assert!(tree.child("comments").unwrap().contains("author"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncludeTree {
	children: HashMap<String, IncludeTree>,
}

impl IncludeTree {
	/// Build a tree from dot-delimited path strings
	///
	/// Empty segments and surrounding whitespace are discarded.
	pub fn parse<I, S>(paths: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut root = IncludeTree::default();
		for path in paths {
			let mut node = &mut root;
			for segment in path.as_ref().split('.') {
				let segment = segment.trim();
				if segment.is_empty() {
					continue;
				}
				node = node.children.entry(segment.to_string()).or_default();
			}
		}
		root
	}

	/// The subtree requested beneath `name`, if any
	pub fn child(&self, name: &str) -> Option<&IncludeTree> {
		self.children.get(name)
	}

	/// Whether `name` is requested at this depth
	pub fn contains(&self, name: &str) -> bool {
		self.children.contains_key(name)
	}

	/// Whether anything at all is requested beneath this node
	pub fn is_empty(&self) -> bool {
		self.children.is_empty()
	}
}
