//! Documentation Pipeline
//!
//! Three sequential steps over the docs tree:
//!
//! 1. [`cleaner`]: drop non-Markdown files from `input`
//! 2. [`transformer`]: send changed pages through the model into `output`
//! 3. [`compiler`]: concatenate each library into one public file

pub mod checksum;
pub mod cleaner;
pub mod compiler;
pub mod layout;
pub mod lock;
pub mod status;
pub mod transformer;

pub use checksum::ContentChecksum;
pub use cleaner::{CleanReport, clean};
pub use compiler::{CompileReport, CompileSource, CompiledLibrary, Compiler};
pub use layout::{
    Library, ProjectLayout, discover_libraries, input_to_output, is_markdown, lock_key,
    mirror_output_path, read_page, walk_files,
};
pub use lock::LockFile;
pub use status::{LibraryStatus, ProjectStatus};
pub use transformer::{
    OutputSource, ProcessedFile, TransformOptions, TransformReport, Transformer, contains_markup,
};
