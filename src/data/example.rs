use std::collections::BTreeMap;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// An encoded image ready to be embedded into a model prompt.
///
/// The payload is opaque to the harness: it carries the encoded bytes, the
/// pixel dimensions after any downscaling, and the media type used for the
/// encoding. Predictors that talk to multimodal endpoints usually want
/// [`data_url`](ImagePayload::data_url).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub media_type: String,
}

impl ImagePayload {
    pub fn new(bytes: Vec<u8>, width: u32, height: u32, media_type: impl Into<String>) -> Self {
        Self {
            bytes,
            width,
            height,
            media_type: media_type.into(),
        }
    }

    /// Renders the payload as a `data:` URL suitable for an image message part.
    pub fn data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.media_type,
            STANDARD.encode(&self.bytes)
        )
    }
}

/// A labeled example: one image and the ground-truth number of people in it.
///
/// The label comes from the name of the directory the image was loaded from
/// and is immutable after the dataset build.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CountExample {
    pub image: ImagePayload,
    pub number_of_people: u32,
}

impl CountExample {
    pub fn new(image: ImagePayload, number_of_people: u32) -> Self {
        Self {
            image,
            number_of_people,
        }
    }
}

/// Examples per label, for dataset summaries.
pub fn label_distribution(dataset: &[CountExample]) -> BTreeMap<u32, usize> {
    let mut counts = BTreeMap::new();
    for example in dataset {
        *counts.entry(example.number_of_people).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example(label: u32) -> CountExample {
        CountExample::new(ImagePayload::new(vec![label as u8], 1, 1, "image/png"), label)
    }

    #[test]
    fn test_data_url_encodes_bytes() {
        let payload = ImagePayload::new(vec![1, 2, 3], 2, 2, "image/png");
        assert_eq!(payload.data_url(), "data:image/png;base64,AQID");
    }

    #[test]
    fn test_label_distribution() {
        let dataset = vec![example(0), example(1), example(1), example(3)];
        let counts = label_distribution(&dataset);
        assert_eq!(counts.get(&0), Some(&1));
        assert_eq!(counts.get(&1), Some(&2));
        assert_eq!(counts.get(&2), None);
        assert_eq!(counts.get(&3), Some(&1));
    }
}
