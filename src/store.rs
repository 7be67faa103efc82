use std::collections::HashMap;

use crate::image::Image;
use crate::Error;

/// Named images kept between instructions of one editing session.
pub trait ImageCollection {
    fn get(&self, name: &str) -> crate::Result<&Image>;

    /// Stores `image` under `name`, replacing any earlier image of that name.
    fn put(&mut self, name: &str, image: Image) -> crate::Result<()>;
}

#[derive(Default)]
pub struct ImageStore {
    ledger: HashMap<String, Image>,
}

impl ImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.ledger.contains_key(name)
    }
}

impl ImageCollection for ImageStore {
    fn get(&self, name: &str) -> crate::Result<&Image> {
        self.ledger
            .get(name)
            .ok_or_else(|| Error::ImageNotFound(name.to_owned()))
    }

    fn put(&mut self, name: &str, image: Image) -> crate::Result<()> {
        if name.is_empty() {
            return Err(Error::EmptyImageName);
        }
        log::debug!("storing image '{}'", name);
        self.ledger.insert(name.to_owned(), image);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::{ImageCollection, ImageStore};
    use crate::color::Pixel;
    use crate::error::{Error, ErrorKind};
    use crate::image::Image;

    fn grey_image(level: u16) -> Image {
        Image::new(1, 1, 255, vec![Pixel::grey(level)]).unwrap()
    }

    #[test]
    fn get_missing_image() {
        let store = ImageStore::new();
        let error = store.get("koala").unwrap_err();
        assert!(matches!(error, Error::ImageNotFound(ref name) if name == "koala"));
        assert_eq!(error.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn last_write_wins() {
        let mut store = ImageStore::new();
        store.put("koala", grey_image(1)).unwrap();
        store.put("koala", grey_image(2)).unwrap();
        assert_eq!(store.get("koala").unwrap(), &grey_image(2));
    }

    #[test]
    fn names_are_case_sensitive() {
        let mut store = ImageStore::new();
        store.put("Koala", grey_image(1)).unwrap();
        assert!(store.contains("Koala"));
        assert!(!store.contains("koala"));
    }

    #[test]
    fn reject_empty_name() {
        let mut store = ImageStore::new();
        assert!(matches!(
            store.put("", grey_image(1)),
            Err(Error::EmptyImageName)
        ));
    }

    #[test]
    fn derived_image_does_not_alias_source() {
        let mut store = ImageStore::new();
        store.put("koala", grey_image(10)).unwrap();
        let brighter = store.get("koala").unwrap().brighten(5);
        store.put("koala-bright", brighter).unwrap();
        assert_eq!(store.get("koala").unwrap(), &grey_image(10));
        assert_eq!(store.get("koala-bright").unwrap(), &grey_image(15));
    }
}
