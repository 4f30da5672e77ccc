//! One-screen summary of an export document.

#[cfg(test)]
#[path = "inspect_test.rs"]
mod inspect_test;

use std::collections::BTreeMap;
use std::fmt;

use canvas::export::{ExportDocument, ImageInfo};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub image: Option<ImageInfo>,
    pub markers: usize,
    pub annotations: BTreeMap<&'static str, usize>,
    pub export_date: String,
    pub file_name: String,
    /// Result of checking every coordinate and width against the declared image.
    pub check: Result<(), String>,
}

#[must_use]
pub fn summarize(doc: &ExportDocument) -> Summary {
    let mut annotations = BTreeMap::new();
    for annotation in &doc.annotations {
        *annotations.entry(annotation.shape.kind()).or_insert(0) += 1;
    }
    let check = match &doc.image {
        Some(info) => doc.check_fits(info.size.width, info.size.height).map_err(|e| e.to_string()),
        None if doc.markers.is_empty() && doc.annotations.is_empty() => Ok(()),
        None => Err("document has data but no image".to_owned()),
    };
    Summary {
        image: doc.image.clone(),
        markers: doc.markers.len(),
        annotations,
        export_date: doc.export_date.clone(),
        file_name: doc.file_name(),
        check,
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.image {
            Some(info) => writeln!(f, "image: {} ({}x{})", info.name, info.size.width, info.size.height)?,
            None => writeln!(f, "image: none")?,
        }
        writeln!(f, "markers: {}", self.markers)?;
        let total: usize = self.annotations.values().sum();
        let kinds: Vec<String> = self.annotations.iter().map(|(kind, n)| format!("{kind} {n}")).collect();
        if kinds.is_empty() {
            writeln!(f, "annotations: 0")?;
        } else {
            writeln!(f, "annotations: {total} ({})", kinds.join(", "))?;
        }
        writeln!(f, "exported: {}", self.export_date)?;
        writeln!(f, "file name: {}", self.file_name)?;
        match &self.check {
            Ok(()) => write!(f, "check: ok"),
            Err(e) => write!(f, "check: {e}"),
        }
    }
}
