//! Structural XML scanner.
//!
//! Reads well-formed XML into a [`FlatTree`]. It understands
//! elements, attributes, character data, CDATA sections, comments
//! and processing instructions, and decodes the predefined and
//! numeric character references. The HTML Latin-1 entities and the
//! common typographic ones (`&nbsp;`, `&mdash;`, `&ldquo;`, ...)
//! are decoded as well, since TEI sources routinely use them through
//! their DTD. Document type declarations are otherwise skipped, so
//! any other entity a DTD declares is an error; external entities
//! are never resolved.
//!
//! Whitespace-only text between tags is dropped.

use std::borrow::Cow;
use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::core::error::{Result, XtIndexError};
use crate::core::tree::flat::{FlatTree, TreeBuilder};

/// Parse a complete XML document
pub fn parse_xml(input: &str) -> Result<FlatTree> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    XmlScanner {
        input,
        pos: 0,
        builder: TreeBuilder::new(),
    }
    .run()
}

struct XmlScanner<'a> {
    input: &'a str,
    pos: usize,
    builder: TreeBuilder,
}

impl<'a> XmlScanner<'a> {
    fn error(&self, message: &str) -> XtIndexError {
        XtIndexError::TreeError(format!("Malformed XML at byte {}: {}", self.pos, message))
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    /// Consume through `terminator`, returning the text before it
    fn take_until(&mut self, terminator: &str, what: &str) -> Result<&'a str> {
        let rest = self.rest();
        match rest.find(terminator) {
            Some(end) => {
                self.pos += end + terminator.len();
                Ok(&rest[..end])
            }
            None => Err(self.error(&format!("unterminated {what}"))),
        }
    }

    fn take_name(&mut self) -> Result<&'a str> {
        let rest = self.rest();
        let end = rest
            .find(|c: char| c.is_whitespace() || matches!(c, '/' | '>' | '=' | '<' | '?'))
            .unwrap_or(rest.len());
        if end == 0 {
            return Err(self.error("expected a name"));
        }
        self.pos += end;
        Ok(&rest[..end])
    }

    fn expect(&mut self, token: &str) -> Result<()> {
        if self.rest().starts_with(token) {
            self.pos += token.len();
            Ok(())
        } else {
            Err(self.error(&format!("expected '{token}'")))
        }
    }

    fn run(mut self) -> Result<FlatTree> {
        while self.pos < self.input.len() {
            let rest = self.rest();
            if !rest.starts_with('<') {
                self.text()?;
            } else if rest.starts_with("<!--") {
                self.pos += 4;
                let body = self.take_until("-->", "comment")?;
                self.builder.comment(body);
            } else if rest.starts_with("<![CDATA[") {
                if self.builder.depth() == 0 {
                    return Err(self.error("CDATA outside the root element"));
                }
                self.pos += 9;
                let body = self.take_until("]]>", "CDATA section")?;
                self.builder.text(body);
            } else if rest.starts_with("<!") {
                self.skip_declaration()?;
            } else if rest.starts_with("<?") {
                self.processing_instruction()?;
            } else if rest.starts_with("</") {
                self.end_tag()?;
            } else {
                self.start_tag()?;
            }
        }

        self.builder.finish()
    }

    fn text(&mut self) -> Result<()> {
        let rest = self.rest();
        let end = rest.find('<').unwrap_or(rest.len());
        let raw = &rest[..end];

        if raw.trim().is_empty() {
            self.pos += end;
            return Ok(());
        }
        if self.builder.depth() == 0 {
            return Err(self.error("text outside the root element"));
        }

        let decoded = decode_entities(raw).map_err(|m| self.error(&m))?;
        self.builder.text(&decoded);
        self.pos += end;
        Ok(())
    }

    fn start_tag(&mut self) -> Result<()> {
        self.pos += 1;
        let name = self.take_name()?;
        self.builder.start_element(name);

        loop {
            self.skip_whitespace();
            let rest = self.rest();
            if rest.starts_with("/>") {
                self.pos += 2;
                return self.builder.end_element(name);
            }
            if rest.starts_with('>') {
                self.pos += 1;
                return Ok(());
            }
            if rest.is_empty() {
                return Err(self.error(&format!("unterminated start tag <{name}>")));
            }

            let attr = self.take_name()?;
            self.skip_whitespace();
            self.expect("=")?;
            self.skip_whitespace();

            let quote = match self.rest().chars().next() {
                Some(q @ ('"' | '\'')) => q,
                _ => return Err(self.error(&format!("unquoted value for attribute '{attr}'"))),
            };
            self.pos += 1;
            let raw = self.take_until(&quote.to_string(), "attribute value")?;
            if raw.contains('<') {
                return Err(self.error(&format!("'<' in value of attribute '{attr}'")));
            }
            let value = decode_entities(raw).map_err(|m| self.error(&m))?;
            self.builder.attribute(attr, &value)?;
        }
    }

    fn end_tag(&mut self) -> Result<()> {
        self.pos += 2;
        let name = self.take_name()?;
        self.skip_whitespace();
        self.expect(">")?;
        self.builder.end_element(name)
    }

    fn processing_instruction(&mut self) -> Result<()> {
        self.pos += 2;
        let target = self.take_name()?;
        let body = self.take_until("?>", "processing instruction")?;
        if !target.eq_ignore_ascii_case("xml") {
            self.builder.processing_instruction(target, body.trim());
        }
        Ok(())
    }

    /// Skip `<!DOCTYPE ...>` including an internal subset
    fn skip_declaration(&mut self) -> Result<()> {
        let mut depth = 0usize;
        let mut quote: Option<char> = None;

        for (offset, c) in self.rest().char_indices() {
            match (quote, c) {
                (Some(q), c) if c == q => quote = None,
                (Some(_), _) => {}
                (None, '"' | '\'') => quote = Some(c),
                (None, '[') => depth += 1,
                (None, ']') => depth = depth.saturating_sub(1),
                (None, '>') if depth == 0 => {
                    self.pos += offset + 1;
                    return Ok(());
                }
                _ => {}
            }
        }

        Err(self.error("unterminated declaration"))
    }
}

/// Latin-1 entity names, in code point order from U+00A0
const LATIN1_ENTITIES: [&str; 96] = [
    "nbsp", "iexcl", "cent", "pound", "curren", "yen", "brvbar", "sect", "uml", "copy", "ordf",
    "laquo", "not", "shy", "reg", "macr", "deg", "plusmn", "sup2", "sup3", "acute", "micro",
    "para", "middot", "cedil", "sup1", "ordm", "raquo", "frac14", "frac12", "frac34", "iquest",
    "Agrave", "Aacute", "Acirc", "Atilde", "Auml", "Aring", "AElig", "Ccedil", "Egrave",
    "Eacute", "Ecirc", "Euml", "Igrave", "Iacute", "Icirc", "Iuml", "ETH", "Ntilde", "Ograve",
    "Oacute", "Ocirc", "Otilde", "Ouml", "times", "Oslash", "Ugrave", "Uacute", "Ucirc", "Uuml",
    "Yacute", "THORN", "szlig", "agrave", "aacute", "acirc", "atilde", "auml", "aring", "aelig",
    "ccedil", "egrave", "eacute", "ecirc", "euml", "igrave", "iacute", "icirc", "iuml", "eth",
    "ntilde", "ograve", "oacute", "ocirc", "otilde", "ouml", "divide", "oslash", "ugrave",
    "uacute", "ucirc", "uuml", "yacute", "thorn", "yuml",
];

const SPECIAL_ENTITIES: &[(&str, char)] = &[
    ("OElig", '\u{152}'),
    ("oelig", '\u{153}'),
    ("Scaron", '\u{160}'),
    ("scaron", '\u{161}'),
    ("Yuml", '\u{178}'),
    ("fnof", '\u{192}'),
    ("circ", '\u{2c6}'),
    ("tilde", '\u{2dc}'),
    ("ensp", '\u{2002}'),
    ("emsp", '\u{2003}'),
    ("thinsp", '\u{2009}'),
    ("zwnj", '\u{200c}'),
    ("zwj", '\u{200d}'),
    ("lrm", '\u{200e}'),
    ("rlm", '\u{200f}'),
    ("ndash", '\u{2013}'),
    ("mdash", '\u{2014}'),
    ("lsquo", '\u{2018}'),
    ("rsquo", '\u{2019}'),
    ("sbquo", '\u{201a}'),
    ("ldquo", '\u{201c}'),
    ("rdquo", '\u{201d}'),
    ("bdquo", '\u{201e}'),
    ("dagger", '\u{2020}'),
    ("Dagger", '\u{2021}'),
    ("bull", '\u{2022}'),
    ("hellip", '\u{2026}'),
    ("permil", '\u{2030}'),
    ("prime", '\u{2032}'),
    ("Prime", '\u{2033}'),
    ("lsaquo", '\u{2039}'),
    ("rsaquo", '\u{203a}'),
    ("euro", '\u{20ac}'),
    ("trade", '\u{2122}'),
    ("larr", '\u{2190}'),
    ("rarr", '\u{2192}'),
];

static NAMED_ENTITIES: Lazy<HashMap<&'static str, char>> = Lazy::new(|| {
    let latin1 = LATIN1_ENTITIES
        .iter()
        .zip(0xA0u32..)
        .filter_map(|(name, code)| char::from_u32(code).map(|c| (*name, c)));
    latin1.chain(SPECIAL_ENTITIES.iter().copied()).collect()
});

/// Replace character, predefined and named entity references
fn decode_entities(raw: &str) -> std::result::Result<Cow<'_, str>, String> {
    if !raw.contains('&') {
        return Ok(Cow::Borrowed(raw));
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let semi = after
            .find(';')
            .ok_or_else(|| format!("unterminated entity in '{raw}'"))?;
        let entity = &after[..semi];

        let decoded = match entity {
            "lt" => '<',
            "gt" => '>',
            "amp" => '&',
            "quot" => '"',
            "apos" => '\'',
            _ => {
                let code = if let Some(hex) = entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                {
                    u32::from_str_radix(hex, 16).ok()
                } else if let Some(dec) = entity.strip_prefix('#') {
                    dec.parse::<u32>().ok()
                } else if let Some(&c) = NAMED_ENTITIES.get(entity) {
                    Some(c as u32)
                } else {
                    return Err(format!("unknown entity '&{entity};'"));
                };
                code.and_then(char::from_u32)
                    .ok_or_else(|| format!("invalid character reference '&{entity};'"))?
            }
        };
        out.push(decoded);
        rest = &after[semi + 1..];
    }
    out.push_str(rest);

    Ok(Cow::Owned(out))
}
