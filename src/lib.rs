pub mod cli;
pub mod constants;
pub mod error;
pub mod info;
pub mod interactive;
pub mod logger;
pub mod processing;
pub mod utils;

pub use error::{CompressionError, Result};
pub use info::print_image_info;
pub use interactive::run_interactive;
pub use processing::{
    compress_image, derive_output_path, determine_output_format, flatten_alpha,
    load_image_with_metadata, resize_image, target_dimensions, validate_file_exists,
    validate_input_format, CompressionOptions, CompressionReport,
};
