//! Output file naming.
//!
//! Every input produces five files in the destination directory. Their names
//! are `{basename}{suffix}{extension}`, one fixed suffix per transformation.

use std::path::{Path, PathBuf};

/// The five transformations, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformKind {
    /// Resize, watermark, then embed.
    ResizeWatermarkEmbed,
    /// Embed only.
    EmbedOnly,
    /// Overlay composite, then embed.
    OverlayEmbed,
    /// Grayscale conversion, then embed.
    GrayscaleEmbed,
    /// Grayscale overlay composite, then embed.
    GrayscaleOverlayEmbed,
}

impl TransformKind {
    /// All transformations in execution order.
    pub const ALL: [TransformKind; 5] = [
        TransformKind::ResizeWatermarkEmbed,
        TransformKind::EmbedOnly,
        TransformKind::OverlayEmbed,
        TransformKind::GrayscaleEmbed,
        TransformKind::GrayscaleOverlayEmbed,
    ];

    /// One-based position in the pipeline.
    pub fn number(self) -> usize {
        match self {
            TransformKind::ResizeWatermarkEmbed => 1,
            TransformKind::EmbedOnly => 2,
            TransformKind::OverlayEmbed => 3,
            TransformKind::GrayscaleEmbed => 4,
            TransformKind::GrayscaleOverlayEmbed => 5,
        }
    }

    /// Suffix inserted between basename and extension.
    pub fn suffix(self) -> &'static str {
        match self {
            TransformKind::ResizeWatermarkEmbed => "_1_400x_watermark_steghide",
            TransformKind::EmbedOnly => "_2_steghide",
            TransformKind::OverlayEmbed => "_3_steghide_overlay",
            TransformKind::GrayscaleEmbed => "_4_gray_steghide",
            TransformKind::GrayscaleOverlayEmbed => "_5_gray_steghide_overlay",
        }
    }

    /// Short name used in logs.
    pub fn name(self) -> &'static str {
        match self {
            TransformKind::ResizeWatermarkEmbed => "resize-watermark-embed",
            TransformKind::EmbedOnly => "embed-only",
            TransformKind::OverlayEmbed => "embed-then-overlay",
            TransformKind::GrayscaleEmbed => "grayscale-then-embed",
            TransformKind::GrayscaleOverlayEmbed => "grayscale-overlay-then-embed",
        }
    }
}

/// The five output paths for one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFileSet {
    paths: [PathBuf; 5],
}

impl OutputFileSet {
    /// Path written by `kind`.
    pub fn get(&self, kind: TransformKind) -> &Path {
        &self.paths[kind.number() - 1]
    }

    /// All five paths in pipeline order.
    pub fn iter(&self) -> impl Iterator<Item = (TransformKind, &Path)> {
        TransformKind::ALL
            .into_iter()
            .zip(self.paths.iter().map(PathBuf::as_path))
    }
}

/// Derive the output paths for `basename` + `extension` inside `dest`.
pub fn names_for(dest: &Path, basename: &str, extension: &str) -> OutputFileSet {
    OutputFileSet {
        paths: TransformKind::ALL
            .map(|kind| dest.join(format!("{basename}{}{extension}", kind.suffix()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn five_distinct_names() {
        let set = names_for(Path::new("out"), "photo", ".JPG");
        let unique: HashSet<&Path> = set.iter().map(|(_, p)| p).collect();
        assert_eq!(unique.len(), 5);

        for (_, path) in set.iter() {
            let name = path.file_name().unwrap().to_str().unwrap();
            assert!(name.starts_with("photo_"));
            assert!(name.ends_with(".JPG"));
            assert_eq!(path.parent(), Some(Path::new("out")));
            assert_ne!(path, Path::new("out/photo.JPG"));
        }
    }

    #[test]
    fn exact_names() {
        let set = names_for(Path::new("out"), "photo", ".JPG");
        assert_eq!(
            set.get(TransformKind::ResizeWatermarkEmbed),
            Path::new("out/photo_1_400x_watermark_steghide.JPG")
        );
        assert_eq!(set.get(TransformKind::EmbedOnly), Path::new("out/photo_2_steghide.JPG"));
        assert_eq!(
            set.get(TransformKind::OverlayEmbed),
            Path::new("out/photo_3_steghide_overlay.JPG")
        );
        assert_eq!(
            set.get(TransformKind::GrayscaleEmbed),
            Path::new("out/photo_4_gray_steghide.JPG")
        );
        assert_eq!(
            set.get(TransformKind::GrayscaleOverlayEmbed),
            Path::new("out/photo_5_gray_steghide_overlay.JPG")
        );
    }

    #[test]
    fn empty_extension() {
        let set = names_for(Path::new("/tmp/dest"), "scan", "");
        assert_eq!(
            set.get(TransformKind::EmbedOnly),
            Path::new("/tmp/dest/scan_2_steghide")
        );
    }

    #[test]
    fn naming_is_idempotent() {
        let a = names_for(Path::new("dest"), "my photo", ".png");
        let b = names_for(Path::new("dest"), "my photo", ".png");
        assert_eq!(a, b);
    }

    #[test]
    fn iteration_follows_pipeline_order() {
        let set = names_for(Path::new("d"), "x", ".y");
        let numbers: Vec<usize> = set.iter().map(|(k, _)| k.number()).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
    }
}
