use clap::Parser;
use img_press::cli::{Args, Commands};
use img_press::utils::{create_progress_spinner, print_compression_summary};
use img_press::{error, logger, Result};
use img_press::{compress_image, print_image_info, run_interactive, CompressionOptions};
use std::process;

fn main() {
    let args = Args::parse();
    logger::set_quiet(args.quiet);
    logger::set_verbose(args.verbose);

    if let Err(e) = run(args) {
        error!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    match args.command {
        Commands::Compress {
            input,
            output,
            quality,
            max_width,
            max_height,
        } => {
            let options = CompressionOptions::new(quality, max_width, max_height)?;
            let spinner = create_progress_spinner("Compressing image...");
            let report = compress_image(&input, output, &options)?;
            spinner.finish_and_clear();
            print_compression_summary(&input, &report);
        }
        Commands::Interactive => run_interactive()?,
        Commands::Info { input } => print_image_info(&input)?,
    }

    Ok(())
}
