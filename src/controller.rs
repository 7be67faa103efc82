use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::SplitWhitespace;

use crate::color::GreyscaleComponent;
use crate::command::CommandRegistry;
use crate::image::reader::binary::BinaryImageReader;
use crate::image::reader::ppm::PPMImageReader;
use crate::image::writer::binary::BinaryImageWriter;
use crate::image::writer::ppm::PPMImageWriter;
use crate::image::{Image, ImageReader, ImageWriter};
use crate::store::{ImageCollection, ImageStore};
use crate::{open_input_file, open_output_file, Error};

const COMMENT_MARKER: char = '#';
const PPM_EXTENSION: &str = "ppm";
const MAX_SCRIPT_DEPTH: usize = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Reads editing instructions line by line and applies them to a session
/// local [`ImageStore`]. A failing instruction is reported on the output and
/// the session goes on.
pub struct ImageController<R: BufRead, W: Write> {
    store: ImageStore,
    commands: CommandRegistry,
    input: R,
    output: W,
    script_depth: usize,
}

impl<R: BufRead, W: Write> ImageController<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self::with_commands(input, output, CommandRegistry::default())
    }

    pub fn with_commands(input: R, output: W, commands: CommandRegistry) -> Self {
        Self {
            store: ImageStore::new(),
            commands,
            input,
            output,
            script_depth: 0,
        }
    }

    pub fn store(&self) -> &ImageStore {
        &self.store
    }

    /// Interactive session until the input ends or a quit instruction is read.
    pub fn control(&mut self) -> crate::Result<()> {
        self.welcome_message()?;
        let mut line = String::new();
        loop {
            self.write_message("Type instruction: ")?;
            self.output.flush().map_err(Error::FailedToWriteMessage)?;
            line.clear();
            let bytes_read = self
                .input
                .read_line(&mut line)
                .map_err(Error::UnableToReadInput)?;
            if bytes_read == 0 {
                break;
            }
            if self.execute(&line)? == Flow::Quit {
                break;
            }
        }
        self.farewell_message()
    }

    /// Runs every instruction of a script file. Only I/O failures of the
    /// script itself or of the output abort the run.
    pub fn run_script(&mut self, file_path: &Path) -> crate::Result<Flow> {
        if self.script_depth >= MAX_SCRIPT_DEPTH {
            return Err(Error::ScriptNestingTooDeep(MAX_SCRIPT_DEPTH));
        }
        log::info!("running script '{}'", file_path.display());
        let script = BufReader::new(open_input_file(file_path)?);
        self.script_depth += 1;
        let result = self.execute_lines(script);
        self.script_depth -= 1;
        result
    }

    fn execute_lines<S: BufRead>(&mut self, script: S) -> crate::Result<Flow> {
        for line in script.lines() {
            let line = line.map_err(Error::UnableToReadInput)?;
            if self.execute(&line)? == Flow::Quit {
                return Ok(Flow::Quit);
            }
        }
        Ok(Flow::Continue)
    }

    /// Executes a single instruction line, reporting instruction errors on
    /// the output.
    pub fn execute(&mut self, line: &str) -> crate::Result<Flow> {
        match self.process_instruction(line) {
            Ok(flow) => Ok(flow),
            Err(Error::FailedToWriteMessage(e)) => Err(Error::FailedToWriteMessage(e)),
            Err(e) => {
                log::warn!("instruction '{}' failed: {}", line.trim(), e);
                self.write_message(&format!("Error: {}\n", e))?;
                Ok(Flow::Continue)
            }
        }
    }

    pub fn process_instruction(&mut self, line: &str) -> crate::Result<Flow> {
        let line = line.trim();
        if line.is_empty() || line.starts_with(COMMENT_MARKER) {
            return Ok(Flow::Continue);
        }
        let mut arguments = line.split_whitespace();
        let instruction = next_argument(&mut arguments, "instruction")?;
        log::info!("executing '{}'", line);
        match instruction {
            "q" | "quit" => return Ok(Flow::Quit),
            "load" => self.load(&mut arguments)?,
            "save" => self.save(&mut arguments)?,
            "brighten" => self.brighten(&mut arguments)?,
            "horizontal-flip" => self.transform(&mut arguments, Image::flip_horizontal)?,
            "vertical-flip" => self.transform(&mut arguments, Image::flip_vertical)?,
            "greyscale" => self.greyscale(&mut arguments)?,
            "rgb-split" => self.rgb_split(&mut arguments)?,
            "rgb-combine" => self.rgb_combine(&mut arguments)?,
            "run" => return self.run(&mut arguments),
            "menu" => self.print_menu()?,
            _ => self.run_command(instruction, &mut arguments)?,
        }
        Ok(Flow::Continue)
    }

    fn load(&mut self, arguments: &mut SplitWhitespace) -> crate::Result<()> {
        let file_path = Path::new(next_argument(arguments, "file-path")?);
        let name = next_argument(arguments, "image-name")?;
        check_no_more_arguments(arguments)?;
        let image = if is_ppm_file(file_path) {
            PPMImageReader::new(BufReader::new(open_input_file(file_path)?)).read_image()?
        } else {
            BinaryImageReader::new(file_path).read_image()?
        };
        log::info!(
            "loaded '{}' as '{}' ({}x{})",
            file_path.display(),
            name,
            image.width(),
            image.height()
        );
        self.store.put(name, image)
    }

    fn save(&mut self, arguments: &mut SplitWhitespace) -> crate::Result<()> {
        let file_path = Path::new(next_argument(arguments, "file-path")?);
        let name = next_argument(arguments, "image-name")?;
        check_no_more_arguments(arguments)?;
        let image = self.store.get(name)?;
        if is_ppm_file(file_path) {
            let output_file = open_output_file(file_path)?;
            PPMImageWriter::new(BufWriter::new(output_file)).write_image(image)?;
        } else {
            BinaryImageWriter::new(file_path).write_image(image)?;
        }
        log::info!("saved '{}' to '{}'", name, file_path.display());
        Ok(())
    }

    fn brighten(&mut self, arguments: &mut SplitWhitespace) -> crate::Result<()> {
        let delta = next_argument(arguments, "value")?;
        let delta: i32 = delta
            .parse()
            .map_err(|_| Error::InvalidInstructionArgument("value", delta.to_owned()))?;
        self.transform(arguments, |image| image.brighten(delta))
    }

    fn greyscale(&mut self, arguments: &mut SplitWhitespace) -> crate::Result<()> {
        let component: GreyscaleComponent = next_argument(arguments, "component")?.parse()?;
        self.transform(arguments, |image| image.greyscale(component))
    }

    /// Applies `operation` to the image named by the next argument and stores
    /// the result under the one after it.
    fn transform<F>(&mut self, arguments: &mut SplitWhitespace, operation: F) -> crate::Result<()>
    where
        F: FnOnce(&Image) -> Image,
    {
        let source = next_argument(arguments, "src-image-name")?;
        let destination = next_argument(arguments, "dest-image-name")?;
        check_no_more_arguments(arguments)?;
        let result = operation(self.store.get(source)?);
        self.store.put(destination, result)
    }

    fn rgb_split(&mut self, arguments: &mut SplitWhitespace) -> crate::Result<()> {
        let source = next_argument(arguments, "src-image-name")?;
        let red_name = next_argument(arguments, "red-image-name")?;
        let green_name = next_argument(arguments, "green-image-name")?;
        let blue_name = next_argument(arguments, "blue-image-name")?;
        check_no_more_arguments(arguments)?;
        let (red, green, blue) = self.store.get(source)?.split();
        self.store.put(red_name, red)?;
        self.store.put(green_name, green)?;
        self.store.put(blue_name, blue)
    }

    fn rgb_combine(&mut self, arguments: &mut SplitWhitespace) -> crate::Result<()> {
        let destination = next_argument(arguments, "dest-image-name")?;
        let red_name = next_argument(arguments, "red-image-name")?;
        let green_name = next_argument(arguments, "green-image-name")?;
        let blue_name = next_argument(arguments, "blue-image-name")?;
        check_no_more_arguments(arguments)?;
        let red = self.store.get(red_name)?;
        let combined = red.combine(self.store.get(green_name)?, self.store.get(blue_name)?)?;
        self.store.put(destination, combined)
    }

    fn run(&mut self, arguments: &mut SplitWhitespace) -> crate::Result<Flow> {
        let file_path = next_argument(arguments, "file-path")?;
        check_no_more_arguments(arguments)?;
        self.run_script(Path::new(file_path))
    }

    fn run_command(&mut self, instruction: &str, arguments: &mut SplitWhitespace) -> crate::Result<()> {
        let command = self
            .commands
            .get(instruction)
            .ok_or_else(|| Error::UndefinedInstruction(instruction.to_owned()))?;
        let source = next_argument(arguments, "src-image-name")?;
        let destination = next_argument(arguments, "dest-image-name")?;
        check_no_more_arguments(arguments)?;
        let result = command.apply(self.store.get(source)?);
        self.store.put(destination, result)
    }

    fn write_message(&mut self, message: &str) -> crate::Result<()> {
        self.output
            .write_all(message.as_bytes())
            .map_err(Error::FailedToWriteMessage)
    }

    fn print_menu(&mut self) -> crate::Result<()> {
        let mut menu = String::from("Supported user instructions are:\n");
        menu.push_str("load file-path image-name\n");
        menu.push_str("save file-path image-name\n");
        menu.push_str("brighten value src-image-name dest-image-name\n");
        menu.push_str("horizontal-flip src-image-name dest-image-name\n");
        menu.push_str("vertical-flip src-image-name dest-image-name\n");
        menu.push_str(
            "greyscale red|green|blue|value|intensity|luma src-image-name dest-image-name\n",
        );
        menu.push_str("rgb-split src-image-name red-image-name green-image-name blue-image-name\n");
        menu.push_str(
            "rgb-combine dest-image-name red-image-name green-image-name blue-image-name\n",
        );
        let mut command_names: Vec<&str> = self.commands.names().collect();
        command_names.sort_unstable();
        for name in command_names {
            menu.push_str(&format!("{} src-image-name dest-image-name\n", name));
        }
        menu.push_str("run file-path\n");
        menu.push_str("menu (print supported instruction list)\n");
        menu.push_str("q or quit (quit the program)\n");
        self.write_message(&menu)
    }

    fn welcome_message(&mut self) -> crate::Result<()> {
        self.write_message("Welcome to the image editor!\n")?;
        self.print_menu()
    }

    fn farewell_message(&mut self) -> crate::Result<()> {
        self.write_message("Thank you for using this program!\n")?;
        self.output.flush().map_err(Error::FailedToWriteMessage)
    }
}

fn next_argument<'a>(
    arguments: &mut SplitWhitespace<'a>,
    argument_name: &'static str,
) -> crate::Result<&'a str> {
    arguments
        .next()
        .ok_or(Error::MissingInstructionArgument(argument_name))
}

fn check_no_more_arguments(arguments: &mut SplitWhitespace) -> crate::Result<()> {
    match arguments.next() {
        Some(argument) => Err(Error::UnexpectedInstructionArgument(argument.to_owned())),
        None => Ok(()),
    }
}

fn is_ppm_file(file_path: &Path) -> bool {
    file_path
        .extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case(PPM_EXTENSION))
}
