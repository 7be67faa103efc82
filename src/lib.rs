use std::{
    fs::{File, OpenOptions},
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
};

pub use cli::CLIParser;
pub use color::{ColorMatrix, GreyscaleComponent, Pixel, GREYSCALE_LUMA, SEPIA};
pub use command::{Command, CommandRegistry, Dither};
pub use controller::{Flow, ImageController};
pub use error::{Error, ErrorKind};
pub use crate::image::convolution::{Kernel, BLUR_3X3, SHARPEN_5X5};
pub use crate::image::reader::{binary::BinaryImageReader, ppm::PPMImageReader};
pub use crate::image::writer::{binary::BinaryImageWriter, ppm::PPMImageWriter};
pub use crate::image::{Image, ImageReader, ImageWriter};
pub use store::{ImageCollection, ImageStore};

mod cli;
mod color;
mod command;
mod controller;
mod error;
mod image;
mod logger;
mod store;

pub type Result<T> = std::result::Result<T, error::Error>;

pub struct Arguments {
    script_file: Option<PathBuf>,
    instructions: Vec<String>,
}

impl Arguments {
    pub fn new(script_file: Option<PathBuf>, instructions: Vec<String>) -> Self {
        Self {
            script_file,
            instructions,
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.script_file.is_none() && self.instructions.is_empty()
    }
}

fn open_input_file(file_path: &Path) -> Result<File> {
    File::open(file_path).map_err(|e| {
        Error::UnableToOpenInputFileForReading(file_path.display().to_string(), e)
    })
}

fn open_output_file(file_path: &Path) -> Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(file_path)
        .map_err(|e| {
            Error::UnableToOpenOutputFileForWriting(file_path.display().to_string(), e)
        })
}

/// Runs one editing session. The script file goes first, then the
/// instructions given on the command line. Without either, instructions are
/// read interactively from `input`.
pub fn execute_session<R: BufRead, W: Write>(
    arguments: &Arguments,
    input: R,
    output: W,
) -> Result<()> {
    let mut controller = ImageController::new(input, output);
    if arguments.is_interactive() {
        return controller.control();
    }
    if let Some(script_file) = &arguments.script_file {
        if controller.run_script(script_file)? == Flow::Quit {
            return Ok(());
        }
    }
    for instruction in &arguments.instructions {
        if controller.execute(instruction)? == Flow::Quit {
            break;
        }
    }
    Ok(())
}

pub fn run(arguments: &Arguments) -> Result<()> {
    execute_session(arguments, io::stdin().lock(), io::stdout().lock())
}
