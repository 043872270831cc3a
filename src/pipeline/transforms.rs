//! Argument construction and step sequencing for each transformation.

use std::path::Path;

use watersteg_core::TransformKind;
use watersteg_tools::{Scratch, Tool, ToolInvocation, ToolOutput};

use super::{Dimensions, RunContext, StepFailure, TransformOutcome};

/// ITU-R BT.709 luma weighting.
const GRAYSCALE_METHOD: &str = "rec709luma";

/// Watermark text offsets from the NorthWest and SouthEast corners.
const WATERMARK_NORTHWEST: &str = "+10+10";
const WATERMARK_SOUTHEAST: &str = "+5+15";

/// Run transformation `kind` from `input` to `output`.
pub fn apply(kind: TransformKind, ctx: &RunContext<'_>, input: &Path, output: &Path) -> TransformOutcome {
    ctx.console.step(format!("creating {} ...", output.display()));
    tracing::debug!(transform = kind.name(), ?input, ?output, "applying transformation");

    match kind {
        TransformKind::ResizeWatermarkEmbed => resize_watermark_embed(ctx, input, output),
        TransformKind::EmbedOnly => embed_only(ctx, input, output),
        TransformKind::OverlayEmbed => overlay_then_embed(ctx, input, ctx.overlay, output),
        TransformKind::GrayscaleEmbed => grayscale_then_embed(ctx, input, output),
        TransformKind::GrayscaleOverlayEmbed => {
            grayscale_overlay_then_embed(ctx, input, ctx.overlay, output)
        }
    }
}

/// Resize to the configured width, tile a text watermark over it, then embed
/// the payload in place.
///
/// The resized copy and the watermark tile live in a [`Scratch`] directory
/// that disappears when this function returns.
pub fn resize_watermark_embed(ctx: &RunContext<'_>, input: &Path, output: &Path) -> TransformOutcome {
    let mut steps = Steps::new(ctx);

    let scratch = match Scratch::new() {
        Ok(scratch) => scratch,
        Err(e) => {
            steps.fail("scratch", "tempfile", e.to_string());
            return steps.finish();
        }
    };
    let extension = input
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let resized = scratch.file(&format!("resized{extension}"));
    let tile = scratch.file("tile.miff");

    let mut resize = ctx.tools.invocation(Tool::Convert);
    resize
        .arg(input)
        .arg("-resize")
        .arg(ctx.settings.resize_width.to_string())
        .arg(&resized);
    steps.run("resize", &resize);

    let text = annotate_text(ctx.message);
    let mut render = ctx.tools.invocation(Tool::Convert);
    render
        .args(["-size", ctx.settings.tile_size.as_str(), "xc:none"])
        .args(["-fill", ctx.settings.tile_fill.as_str()])
        .args(["-gravity", "NorthWest", "-annotate", WATERMARK_NORTHWEST, text.as_str()])
        .args(["-gravity", "SouthEast", "-annotate", WATERMARK_SOUTHEAST, text.as_str()])
        .arg(&tile);
    steps.run("watermark-tile", &render);

    let mut composite = ctx.tools.invocation(Tool::Composite);
    composite.arg("-tile").arg(&tile).arg(&resized).arg(output);
    steps.run("watermark", &composite);

    // `output` was just written, so steghide embeds into it in place.
    steps.run("embed", &embed(ctx, output, None));

    steps.finish()
}

/// Embed the payload into a copy of `input` written to `output`.
pub fn embed_only(ctx: &RunContext<'_>, input: &Path, output: &Path) -> TransformOutcome {
    let mut steps = Steps::new(ctx);
    steps.run("embed", &embed(ctx, input, Some(output)));
    steps.finish()
}

/// Composite `overlay` over `input` at the input's own size, then embed.
pub fn overlay_then_embed(
    ctx: &RunContext<'_>,
    input: &Path,
    overlay: &Path,
    output: &Path,
) -> TransformOutcome {
    let mut steps = Steps::new(ctx);
    let Some(dims) = steps.dimensions(input) else {
        return steps.finish();
    };

    let mut composite = ctx.tools.invocation(Tool::Convert);
    push_overlay_args(&mut composite, dims, input, overlay, output);
    steps.run("overlay", &composite);

    steps.run("embed", &embed(ctx, output, Some(output)));
    steps.finish()
}

/// Convert to BT.709 grayscale, then embed.
pub fn grayscale_then_embed(ctx: &RunContext<'_>, input: &Path, output: &Path) -> TransformOutcome {
    let mut steps = Steps::new(ctx);

    let mut gray = ctx.tools.invocation(Tool::Convert);
    gray.args(["-grayscale", GRAYSCALE_METHOD]).arg(input).arg(output);
    steps.run("grayscale", &gray);

    steps.run("embed", &embed(ctx, output, Some(output)));
    steps.finish()
}

/// Grayscale composite of `input` and `overlay` in a single convert call,
/// then embed.
pub fn grayscale_overlay_then_embed(
    ctx: &RunContext<'_>,
    input: &Path,
    overlay: &Path,
    output: &Path,
) -> TransformOutcome {
    let mut steps = Steps::new(ctx);
    let Some(dims) = steps.dimensions(input) else {
        return steps.finish();
    };

    let mut composite = ctx.tools.invocation(Tool::Convert);
    composite.args(["-grayscale", GRAYSCALE_METHOD]);
    push_overlay_args(&mut composite, dims, input, overlay, output);
    steps.run("grayscale-overlay", &composite);

    steps.run("embed", &embed(ctx, output, Some(output)));
    steps.finish()
}

/// `-annotate` text that convert draws as given.
///
/// convert expands `%` and backslash escapes in the text and reads it from a
/// file when it starts with `@`.
fn annotate_text(message: &str) -> String {
    let mut text = String::with_capacity(message.len() + 2);
    if message.starts_with('@') {
        text.push('\\');
    }
    for c in message.chars() {
        match c {
            '%' => text.push_str("%%"),
            '\\' => text.push_str("\\\\"),
            c => text.push(c),
        }
    }
    text
}

fn push_overlay_args(
    inv: &mut ToolInvocation,
    dims: Dimensions,
    input: &Path,
    overlay: &Path,
    output: &Path,
) {
    inv.arg("-size")
        .arg(dims.to_string())
        .arg("-composite")
        .arg(input)
        .arg(overlay)
        .arg("-geometry")
        .arg(dims.at_origin())
        .args(["-depth", "8"])
        .arg(output);
}

/// `steghide embed` of the shared payload into `cover`.
///
/// With `stego` set the result goes there, overwriting an existing file;
/// otherwise steghide rewrites `cover` itself.
fn embed(ctx: &RunContext<'_>, cover: &Path, stego: Option<&Path>) -> ToolInvocation {
    let mut inv = ctx.tools.invocation(Tool::Steghide);
    inv.arg("embed")
        .arg("-cf")
        .arg(cover)
        .arg("-ef")
        .arg(ctx.payload)
        .arg("-p")
        .arg(ctx.passphrase)
        .arg("-q");
    if let Some(stego) = stego {
        inv.arg("-sf").arg(stego).arg("-f");
    }
    inv
}

/// Runs the steps of one transformation and keeps the first failure.
///
/// A failed step does not stop the following ones: the outcome only reports
/// it.
struct Steps<'c, 'a> {
    ctx: &'c RunContext<'a>,
    failure: Option<StepFailure>,
}

impl<'c, 'a> Steps<'c, 'a> {
    fn new(ctx: &'c RunContext<'a>) -> Self {
        Self { ctx, failure: None }
    }

    /// Run one step. `None` means the tool never ran.
    fn run(&mut self, step: &'static str, invocation: &ToolInvocation) -> Option<ToolOutput> {
        match self.ctx.runner.run(invocation) {
            Ok(output) => {
                if !output.success() {
                    self.record(StepFailure {
                        step,
                        tool: invocation.name(),
                        code: output.code,
                        detail: None,
                    });
                }
                Some(output)
            }
            Err(e) => {
                self.record(StepFailure {
                    step,
                    tool: invocation.name(),
                    code: None,
                    detail: Some(e.to_string()),
                });
                None
            }
        }
    }

    fn fail(&mut self, step: &'static str, tool: &str, detail: String) {
        self.record(StepFailure {
            step,
            tool: tool.to_string(),
            code: None,
            detail: Some(detail),
        });
    }

    /// Query the pixel size of `input`. `None` stops the transformation.
    fn dimensions(&mut self, input: &Path) -> Option<Dimensions> {
        let mut identify = self.ctx.tools.invocation(Tool::Identify);
        identify
            .args(["-format", "%wx%h\n"])
            .arg(input)
            .capture_stdout();

        let output = self.run("identify", &identify)?;
        if !output.success() {
            return None;
        }
        let dims = Dimensions::parse(&output.stdout);
        if dims.is_none() {
            self.fail(
                "identify",
                &identify.name(),
                format!("unexpected size {:?}", output.stdout.trim()),
            );
        }
        dims
    }

    fn record(&mut self, failure: StepFailure) {
        tracing::debug!("{failure}");
        self.failure.get_or_insert(failure);
    }

    fn finish(self) -> TransformOutcome {
        match self.failure {
            None => TransformOutcome::Completed,
            Some(failure) => TransformOutcome::Failed(failure),
        }
    }
}
