use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "img-press",
    about = "Compress PNG, JPG, and JPEG images",
    long_about = "img-press reduces image file sizes by re-encoding with a quality setting and \
                  an optional bounding-box resize. PNG output goes through a lossless oxipng \
                  optimization pass; JPEG output is encoded at the requested quality.",
    version = "0.1.0",
    after_help = "EXAMPLES:\n  \
    img-press compress image.jpg\n  \
    img-press compress image.png -o output.png\n  \
    img-press compress image.jpg -q 75\n  \
    img-press compress image.png --max-width 1920 --max-height 1080\n  \
    img-press interactive\n  \
    img-press info photo.png"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, help = "Suppress all non-error output")]
    pub quiet: bool,

    #[arg(short = 'v', long, global = true, help = "Print extra progress detail")]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(
        about = "Compress a single image file",
        long_about = "Compress a single PNG, JPG, or JPEG file. Without -o the result is written \
                      next to the input as <stem>_compressed.<ext>. The input file is never \
                      modified."
    )]
    Compress {
        #[arg(help = "Input image file path")]
        input: PathBuf,

        #[arg(
            short = 'o',
            long,
            help = "Output image file path (default: <stem>_compressed.<ext>)"
        )]
        output: Option<PathBuf>,

        #[arg(
            short = 'q',
            long,
            help = "Compression quality for JPEG (1-100, default: 85)",
            long_help = "Compression quality from 1 (lowest) to 100 (highest). Applies to JPEG \
                         output only; PNG output is lossless and ignores this setting."
        )]
        quality: Option<u8>,

        #[arg(
            long,
            help = "Maximum width in pixels",
            long_help = "Resize to at most this width while preserving aspect ratio. The image \
                         is only shrunk, never enlarged."
        )]
        max_width: Option<u32>,

        #[arg(
            long,
            help = "Maximum height in pixels",
            long_help = "Resize to at most this height while preserving aspect ratio. Applied \
                         after the width bound; the image is only shrunk, never enlarged."
        )]
        max_height: Option<u32>,
    },

    #[command(
        about = "Pick a file and quality through terminal prompts",
        long_about = "Interactive variant: prompts for a file path (jpg, jpeg, png, tiff, bmp) \
                      and a quality (1-100). An empty line at either prompt cancels without \
                      writing anything."
    )]
    Interactive,

    #[command(about = "Display image information and compression suggestions")]
    Info {
        #[arg(help = "Image file path to analyze")]
        input: PathBuf,
    },
}
