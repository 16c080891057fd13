//! Manifest assembly.
//!
//! Manifests are built incrementally: declarations, dependency calls,
//! plugin exports and code-generation helpers each contribute fragments,
//! in whatever order configuration reaches them. `assemble` is a pure
//! function of the stored fragments and can be called any number of times.

pub mod fragment;
pub mod xml;

use std::collections::BTreeMap;

pub use fragment::{Category, FragmentKey};

/// Handle to one document held by a [`ManifestAssembler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ManifestHandle(usize);

#[derive(Debug, Clone)]
struct Document {
    name: String,
    fragments: BTreeMap<FragmentKey, Vec<String>>,
}

/// Incremental builder for manifest documents.
#[derive(Debug, Clone, Default)]
pub struct ManifestAssembler {
    documents: Vec<Document>,
}

impl ManifestAssembler {
    pub fn new() -> Self {
        ManifestAssembler::default()
    }

    /// Open a document with its mandatory header and footer fragments.
    pub fn open(
        &mut self,
        name: impl Into<String>,
        header: Vec<String>,
        footer: Vec<String>,
    ) -> ManifestHandle {
        let handle = ManifestHandle(self.documents.len());
        self.documents.push(Document {
            name: name.into(),
            fragments: BTreeMap::new(),
        });
        self.write_fragment(handle, Category::Header, "", header);
        self.write_fragment(handle, Category::Footer, "", footer);
        handle
    }

    /// Store a fragment, replacing any previous fragment with the same key.
    ///
    /// Envelope fragments are write-once: if one is already present the call
    /// is a no-op. Returns whether the fragment was stored.
    pub fn write_fragment(
        &mut self,
        handle: ManifestHandle,
        category: Category,
        sub_order: impl Into<String>,
        lines: Vec<String>,
    ) -> bool {
        let key = FragmentKey::new(category, sub_order);
        let document = &mut self.documents[handle.0];

        if category.is_envelope() && document.fragments.contains_key(&key) {
            tracing::trace!("{}: envelope {} already written", document.name, key);
            return false;
        }

        document.fragments.insert(key, lines);
        true
    }

    /// Whether a fragment with this key exists.
    pub fn contains(&self, handle: ManifestHandle, category: Category, sub_order: &str) -> bool {
        self.documents[handle.0]
            .fragments
            .contains_key(&FragmentKey::new(category, sub_order))
    }

    /// Keys of all fragments in assembly order.
    pub fn keys(&self, handle: ManifestHandle) -> impl Iterator<Item = &FragmentKey> {
        self.documents[handle.0].fragments.keys()
    }

    /// Name the document was opened with.
    pub fn name(&self, handle: ManifestHandle) -> &str {
        &self.documents[handle.0].name
    }

    /// Concatenate all fragments in key order.
    pub fn assemble(&self, handle: ManifestHandle) -> String {
        let mut out = String::new();
        for lines in self.documents[handle.0].fragments.values() {
            for line in lines {
                out.push_str(line);
                out.push('\n');
            }
        }
        out
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
