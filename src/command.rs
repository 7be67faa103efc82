use std::collections::HashMap;

use crate::color::{ColorMatrix, GREYSCALE_LUMA, SEPIA};
use crate::image::convolution::{Kernel, BLUR_3X3, SHARPEN_5X5};
use crate::image::Image;

/// An image operation that can be looked up by name and applied without
/// knowing the algorithm behind it.
pub trait Command {
    fn apply(&self, image: &Image) -> Image;
}

impl Command for Kernel<'_> {
    fn apply(&self, image: &Image) -> Image {
        image.convolve(self)
    }
}

impl Command for ColorMatrix {
    fn apply(&self, image: &Image) -> Image {
        image.transform_color(self)
    }
}

pub struct Dither;

impl Command for Dither {
    fn apply(&self, image: &Image) -> Image {
        image.dither()
    }
}

pub struct CommandRegistry {
    commands: HashMap<String, Box<dyn Command>>,
}

impl CommandRegistry {
    pub fn empty() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    pub fn new() -> Self {
        let registry = Self::empty();
        let registry = Self::register_kernels(registry);
        let registry = Self::register_color_matrices(registry);
        Self::register_dither(registry)
    }

    fn register_kernels(registry: Self) -> Self {
        registry
            .with("blur", BLUR_3X3)
            .with("image-blur", BLUR_3X3)
            .with("sharpen", SHARPEN_5X5)
            .with("image-sharpen", SHARPEN_5X5)
    }

    fn register_color_matrices(registry: Self) -> Self {
        registry
            .with("greyscale-luma", GREYSCALE_LUMA)
            .with("grey-scaled", GREYSCALE_LUMA)
            .with("sepia", SEPIA)
    }

    fn register_dither(registry: Self) -> Self {
        registry.with("dither", Dither)
    }

    pub fn with<C: Command + 'static>(mut self, name: &str, command: C) -> Self {
        self.register(name, command);
        self
    }

    /// Replaces a previously registered command of the same name.
    pub fn register<C: Command + 'static>(&mut self, name: &str, command: C) {
        self.commands.insert(name.to_owned(), Box::new(command));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Command> {
        self.commands.get(name).map(|command| &**command)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::{Command, CommandRegistry, Dither};
    use crate::color::{Pixel, SEPIA};
    use crate::image::convolution::BLUR_3X3;
    use crate::image::Image;

    fn sample_image() -> Image {
        Image::new(
            3,
            1,
            255,
            vec![Pixel::new(10, 20, 30), Pixel::new(90, 60, 30), Pixel::new(255, 0, 128)],
        )
        .unwrap()
    }

    #[test]
    fn default_registry_knows_all_filters() {
        let registry = CommandRegistry::default();
        for name in [
            "blur",
            "image-blur",
            "sharpen",
            "image-sharpen",
            "greyscale-luma",
            "grey-scaled",
            "sepia",
            "dither",
        ] {
            assert!(registry.get(name).is_some(), "{} is not registered", name);
        }
        assert!(registry.get("emboss").is_none());
    }

    #[test]
    fn registered_command_matches_direct_call() {
        let registry = CommandRegistry::default();
        let image = sample_image();
        let blur = registry.get("blur").unwrap();
        assert_eq!(blur.apply(&image), BLUR_3X3.convolve(&image));
        let sepia = registry.get("sepia").unwrap();
        assert_eq!(sepia.apply(&image), image.transform_color(&SEPIA));
        let dither = registry.get("dither").unwrap();
        assert_eq!(dither.apply(&image), Dither.apply(&image));
    }

    #[test]
    fn register_custom_command() {
        struct BlackOut;
        impl Command for BlackOut {
            fn apply(&self, image: &Image) -> Image {
                image.brighten(-i32::from(image.max_value()))
            }
        }
        let registry = CommandRegistry::empty().with("black-out", BlackOut);
        assert_eq!(registry.names().count(), 1);
        let result = registry.get("black-out").unwrap().apply(&sample_image());
        assert!(result.dots().iter().all(|dot| *dot == Pixel::grey(0)));
    }
}
