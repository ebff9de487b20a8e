use crate::error::Error;
use crate::Result;
use std::io::Read;
use std::str;

const SIZE_TOKEN_NAME: &str = "Mask Size";
const WEIGHT_TOKEN_NAME: &str = "Mask Weight";

/// Square grid of convolution weights.
///
/// Weights are stored row by row, so the weight applied to the kernel
/// cell `(kx, ky)` lives at index `ky * size + kx`. This matches the
/// order in which a mask file lists its values.
pub struct Mask {
    size: usize,
    weights: Vec<f64>,
}

impl Mask {
    /// Creates a mask of the given edge length with every weight set to
    /// `weight`. With weight 1.0 this is the default blur mask.
    pub fn uniform(size: usize, weight: f64) -> Result<Self> {
        let element_count = Self::checked_element_count(size)?;
        Ok(Mask {
            size,
            weights: vec![weight; element_count],
        })
    }

    fn checked_element_count(size: usize) -> Result<usize> {
        if size == 0 {
            return Err(Error::InvalidMaskSize(size));
        }
        size.checked_mul(size).ok_or(Error::InvalidMaskSize(size))
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Offset from the kernel anchor to its top left cell. For even
    /// sizes the anchor sits below and right of the window center, so
    /// the window reaches `half` cells up and left but `size - half - 1`
    /// cells down and right.
    pub fn half(&self) -> usize {
        self.size / 2
    }

    pub fn element_count(&self) -> usize {
        self.weights.len()
    }

    pub fn weight(&self, kx: usize, ky: usize) -> f64 {
        debug_assert!(kx < self.size && ky < self.size);
        self.weights[ky * self.size + kx]
    }
}

/// Splits a mask file into whitespace-separated tokens, reading one
/// byte at a time. Any ASCII whitespace separates tokens; the format
/// has no comment syntax.
pub struct MaskTokenizer<R: Read> {
    reader: R,
    buffer: Vec<u8>,
}

impl<R: Read> MaskTokenizer<R> {
    pub fn new(reader: R) -> Self {
        MaskTokenizer {
            reader,
            buffer: Vec::new(),
        }
    }
}

impl<R: Read> Iterator for MaskTokenizer<R> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        self.buffer.clear();
        let mut byte = [0; 1];

        while self.reader.read(&mut byte).unwrap_or(0) > 0 {
            if byte[0].is_ascii_whitespace() {
                if !self.buffer.is_empty() {
                    break;
                }
            } else {
                self.buffer.push(byte[0]);
            }
        }

        if self.buffer.is_empty() {
            return None;
        }

        let token = str::from_utf8(&self.buffer)
            .expect("Invalid UTF-8 sequence")
            .to_string();
        Some(token)
    }
}

pub struct MaskParser;

impl MaskParser {
    /// Parses a token stream into a mask. The first token is the edge
    /// length, followed by `size * size` weights row by row. Tokens
    /// after the last weight are ignored.
    pub fn parse<I: Iterator<Item = String>>(mut tokenizer: I) -> Result<Mask> {
        let size: usize = tokenizer
            .next()
            .ok_or(Error::MaskFileDoesNotContainRequiredToken(SIZE_TOKEN_NAME))?
            .parse()
            .map_err(|_| Error::ParsingOfMaskTokenFailed(SIZE_TOKEN_NAME))?;
        let element_count = Mask::checked_element_count(size)?;

        let mut weights: Vec<f64> = Vec::with_capacity(element_count);
        for found in 0..element_count {
            let token = tokenizer
                .next()
                .ok_or(Error::NotEnoughMaskValues(element_count, found))?;
            weights.push(
                token
                    .parse()
                    .map_err(|_| Error::ParsingOfMaskTokenFailed(WEIGHT_TOKEN_NAME))?,
            );
        }

        Ok(Mask { size, weights })
    }
}

#[cfg(test)]
mod test {
    use crate::error::Error;

    use super::{Mask, MaskParser, MaskTokenizer};

    #[test]
    fn uniform_mask_fills_every_cell() {
        let mask = Mask::uniform(3, 1.0).unwrap();
        assert_eq!(mask.size(), 3);
        assert_eq!(mask.half(), 1);
        assert_eq!(mask.element_count(), 9);
        for ky in 0..3 {
            for kx in 0..3 {
                assert_eq!(mask.weight(kx, ky), 1.0);
            }
        }
    }

    #[test]
    fn zero_mask_size_is_rejected() {
        if let Err(Error::InvalidMaskSize(size)) = Mask::uniform(0, 1.0) {
            assert_eq!(size, 0);
            return;
        }
        panic!("Mask of size zero was not rejected");
    }

    #[test]
    fn even_mask_half_rounds_down() {
        let mask = Mask::uniform(4, 1.0).unwrap();
        assert_eq!(mask.half(), 2);
    }

    #[test]
    fn read_string() {
        let string = "2 1 2 3 4";
        let mask = MaskParser::parse(MaskTokenizer::new(string.as_bytes())).unwrap();
        assert_eq!(mask.size(), 2);
        assert_eq!(mask.weight(0, 0), 1.0);
        assert_eq!(mask.weight(1, 0), 2.0);
        assert_eq!(mask.weight(0, 1), 3.0);
        assert_eq!(mask.weight(1, 1), 4.0);
    }

    #[test]
    fn read_newline_string() {
        let string = "2\n1.5\n2.5\n3.5\n4.5\n";
        let mask = MaskParser::parse(MaskTokenizer::new(string.as_bytes())).unwrap();
        assert_eq!(mask.size(), 2);
        assert_eq!(mask.weight(1, 1), 4.5);
    }

    #[test]
    fn tokens_after_last_weight_are_ignored() {
        let string = "1 7.0 99 98 97";
        let mask = MaskParser::parse(MaskTokenizer::new(string.as_bytes())).unwrap();
        assert_eq!(mask.size(), 1);
        assert_eq!(mask.weight(0, 0), 7.0);
    }

    #[test]
    fn missing_size_token() {
        let string = "   \n\t ";
        if let Err(Error::MaskFileDoesNotContainRequiredToken(token_name)) =
            MaskParser::parse(MaskTokenizer::new(string.as_bytes()))
        {
            assert_eq!(token_name, "Mask Size");
            return;
        }
        panic!("Missing size token was not detected");
    }

    #[test]
    fn unparsable_size_token() {
        let string = "three 1 2 3";
        if let Err(Error::ParsingOfMaskTokenFailed(token_name)) =
            MaskParser::parse(MaskTokenizer::new(string.as_bytes()))
        {
            assert_eq!(token_name, "Mask Size");
            return;
        }
        panic!("Unparsable size token was not detected");
    }

    #[test]
    fn unparsable_weight_token() {
        let string = "2 1.0 2.0 x 4.0";
        if let Err(Error::ParsingOfMaskTokenFailed(token_name)) =
            MaskParser::parse(MaskTokenizer::new(string.as_bytes()))
        {
            assert_eq!(token_name, "Mask Weight");
            return;
        }
        panic!("Unparsable weight token was not detected");
    }

    #[test]
    fn truncated_weight_list() {
        let string = "3 1 2 3 4";
        if let Err(Error::NotEnoughMaskValues(expected, found)) =
            MaskParser::parse(MaskTokenizer::new(string.as_bytes()))
        {
            assert_eq!(expected, 9);
            assert_eq!(found, 4);
            return;
        }
        panic!("Truncated weight list was not detected");
    }

    #[test]
    fn zero_size_in_file() {
        let string = "0";
        if let Err(Error::InvalidMaskSize(0)) =
            MaskParser::parse(MaskTokenizer::new(string.as_bytes()))
        {
            return;
        }
        panic!("Mask file declaring size zero was not rejected");
    }
}
