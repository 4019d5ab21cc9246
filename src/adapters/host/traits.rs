//! Document host abstraction traits
//!
//! This module defines the two narrow seams the export pipeline talks
//! through: a [`DocumentHost`] that creates, fills, trims and closes
//! documents, and a [`LayeredWriter`] that persists one of those documents
//! with its layer structure intact.

use crate::domain::{HostError, LayeredDocument, NewDocumentSpec, SourceDocument};
use std::path::Path;

/// Host that owns document creation and layer manipulation
///
/// Every operation receives the documents it acts on explicitly; there is no
/// notion of a "current" document on this trait.
pub trait DocumentHost {
    /// Create a new, empty document
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters are invalid or a host limit
    /// (such as the number of open documents) would be exceeded. No document
    /// is left open when this fails.
    fn create_document(&mut self, spec: &NewDocumentSpec) -> Result<LayeredDocument, HostError>;

    /// Copy the top-level group at `group_index` of `source` into `target`,
    /// above any existing content
    ///
    /// # Errors
    ///
    /// Returns an error if there is no group at that index.
    fn duplicate_group(
        &mut self,
        source: &SourceDocument,
        group_index: usize,
        target: &mut LayeredDocument,
    ) -> Result<(), HostError>;

    /// Crop the canvas of `target` to the bounding box of its non-transparent
    /// pixels, on all four edges
    ///
    /// # Errors
    ///
    /// Returns an error if the host cannot perform the crop.
    fn trim_transparent(&mut self, target: &mut LayeredDocument) -> Result<(), HostError>;

    /// Close a document without saving it
    fn close_document(&mut self, document: LayeredDocument);
}

/// Writer for the layered file format
pub trait LayeredWriter {
    /// Persist `document` to `path`, keeping every layer and group separate
    ///
    /// An existing file at `path` is replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be encoded or the file cannot
    /// be written.
    fn write_layered(&mut self, document: &LayeredDocument, path: &Path) -> Result<(), HostError>;
}

impl<H: DocumentHost + ?Sized> DocumentHost for &mut H {
    fn create_document(&mut self, spec: &NewDocumentSpec) -> Result<LayeredDocument, HostError> {
        (**self).create_document(spec)
    }

    fn duplicate_group(
        &mut self,
        source: &SourceDocument,
        group_index: usize,
        target: &mut LayeredDocument,
    ) -> Result<(), HostError> {
        (**self).duplicate_group(source, group_index, target)
    }

    fn trim_transparent(&mut self, target: &mut LayeredDocument) -> Result<(), HostError> {
        (**self).trim_transparent(target)
    }

    fn close_document(&mut self, document: LayeredDocument) {
        (**self).close_document(document)
    }
}

impl<W: LayeredWriter + ?Sized> LayeredWriter for &mut W {
    fn write_layered(&mut self, document: &LayeredDocument, path: &Path) -> Result<(), HostError> {
        (**self).write_layered(document, path)
    }
}
