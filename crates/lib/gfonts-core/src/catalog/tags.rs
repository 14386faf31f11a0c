use std::fs::File;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter};
use gfonts_store::models::FontStyle;
use tracing::debug;

use super::{CatalogError, leading_integer};

const WEIGHT_AXIS: &str = "wght";
const ITALIC_MARKER: &str = "ital";

/// A row of the master tag list: name in column 1, description in column 4.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagMetadata {
    pub name: String,
    pub description: String,
}

impl TagMetadata {
    fn from_record(record: &StringRecord) -> Option<Self> {
        let name = non_empty(record, 0)?;
        let description = non_empty(record, 3)?;
        Some(Self {
            name: name.to_string(),
            description: description.to_string(),
        })
    }
}

/// A family-level tag association: `family, _, tag, value`.
#[derive(Debug, Clone, PartialEq)]
pub struct FontTagRow {
    pub family: String,
    pub tag: String,
    pub value: f64,
}

impl FontTagRow {
    fn from_record(record: &StringRecord) -> Option<Self> {
        let family = non_empty(record, 0)?;
        let tag = non_empty(record, 2)?;
        let value = parse_value(non_empty(record, 3)?)?;
        Some(Self {
            family: family.to_string(),
            tag: tag.to_string(),
            value,
        })
    }
}

/// A variant-level tag association: `family, style@weight, tag, value`.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantTagRow {
    pub family: String,
    pub style: FontStyle,
    pub weight: i64,
    pub tag: String,
    pub value: f64,
}

impl VariantTagRow {
    fn from_record(record: &StringRecord) -> Option<Self> {
        let family = non_empty(record, 0)?;
        let (style, weight) = parse_style_weight(non_empty(record, 1)?)?;
        let tag = non_empty(record, 2)?;
        let value = parse_value(non_empty(record, 3)?)?;
        Some(Self {
            family: family.to_string(),
            style,
            weight,
            tag: tag.to_string(),
            value,
        })
    }
}

/// Parses a `<axes>@<values>` token such as `wght@700` or `ital,wght@1,700`.
///
/// The style is italic when the axes fragment mentions `ital`. The weight is
/// the value aligned with the `wght` axis, or the first value when no axis is
/// named `wght`.
#[must_use]
pub fn parse_style_weight(token: &str) -> Option<(FontStyle, i64)> {
    let (axes, values) = token.split_once('@')?;
    let style = if axes.contains(ITALIC_MARKER) {
        FontStyle::Italic
    } else {
        FontStyle::Normal
    };
    let position = axes
        .split(',')
        .position(|axis| axis.contains(WEIGHT_AXIS))
        .unwrap_or(0);
    let value = values.split(',').nth(position).or_else(|| values.split(',').next())?;
    let weight = leading_integer(value)?;
    Some((style, weight))
}

/// Row-by-row reader over a header-less CSV file.
///
/// Yields `Ok(Some(row))` for usable rows and `Ok(None)` for rows that are
/// malformed or under-populated. Only I/O failures are returned as errors.
pub struct CsvRowStream<T> {
    path: PathBuf,
    records: StringRecordsIntoIter<File>,
    parse: fn(&StringRecord) -> Option<T>,
}

impl<T> CsvRowStream<T> {
    fn open(path: &Path, parse: fn(&StringRecord) -> Option<T>) -> Result<Self, CatalogError> {
        let reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .map_err(|source| csv_error(path, source))?;
        Ok(Self {
            path: path.to_path_buf(),
            records: reader.into_records(),
            parse,
        })
    }
}

impl<T> Iterator for CsvRowStream<T> {
    type Item = Result<Option<T>, CatalogError>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        Some(match record {
            Ok(record) => Ok((self.parse)(&record)),
            Err(err) if err.is_io_error() => Err(csv_error(&self.path, err)),
            Err(err) => {
                debug!(path = %self.path.display(), error = %err, "skipping unreadable CSV row");
                Ok(None)
            }
        })
    }
}

/// Reads the whole master tag list.
///
/// Returns the usable rows and the number of skipped rows.
///
/// # Errors
/// Returns `CatalogError` if the file cannot be opened or read.
pub fn read_tag_metadata(path: &Path) -> Result<(Vec<TagMetadata>, usize), CatalogError> {
    let mut tags = Vec::new();
    let mut skipped = 0;
    for row in CsvRowStream::open(path, TagMetadata::from_record)? {
        match row? {
            Some(tag) => tags.push(tag),
            None => skipped += 1,
        }
    }
    Ok((tags, skipped))
}

/// Opens a streaming reader over the family tag associations.
///
/// # Errors
/// Returns `CatalogError` if the file cannot be opened.
pub fn stream_font_tags(path: &Path) -> Result<CsvRowStream<FontTagRow>, CatalogError> {
    CsvRowStream::open(path, FontTagRow::from_record)
}

/// Opens a streaming reader over the variant tag associations.
///
/// # Errors
/// Returns `CatalogError` if the file cannot be opened.
pub fn stream_variant_tags(path: &Path) -> Result<CsvRowStream<VariantTagRow>, CatalogError> {
    CsvRowStream::open(path, VariantTagRow::from_record)
}

fn non_empty(record: &StringRecord, index: usize) -> Option<&str> {
    record.get(index).filter(|value| !value.is_empty())
}

fn parse_value(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

fn csv_error(path: &Path, source: csv::Error) -> CatalogError {
    CatalogError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_csv(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).expect("write csv fixture");
        path
    }

    #[test]
    fn style_weight_tokens() {
        assert_eq!(parse_style_weight("wght@700"), Some((FontStyle::Normal, 700)));
        assert_eq!(parse_style_weight("ital@400"), Some((FontStyle::Italic, 400)));
        assert_eq!(
            parse_style_weight("ital,wght@1,300"),
            Some((FontStyle::Italic, 300))
        );
        assert_eq!(parse_style_weight("wght"), None);
        assert_eq!(parse_style_weight("wght@"), None);
    }

    #[test]
    fn tag_metadata_skips_short_and_empty_rows() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_csv(
            dir.path(),
            "tags_metadata.csv",
            "/Expressive/Calm,0,100,\"Calm, relaxed\"\n\
             /Theme/Blobby,0,100,\n\
             short,row\n\
             ,0,100,No name\n",
        );
        let (tags, skipped) = read_tag_metadata(&path).expect("read tag metadata");
        assert_eq!(
            tags,
            vec![TagMetadata {
                name: "/Expressive/Calm".to_string(),
                description: "Calm, relaxed".to_string(),
            }]
        );
        assert_eq!(skipped, 3);
    }

    #[test]
    fn font_tag_rows_require_family_tag_and_value() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_csv(
            dir.path(),
            "families.csv",
            "Roboto,,/Expressive/Calm,80\n\
             Roboto,,,80\n\
             Roboto,,/Expressive/Calm,not-a-number\n\
             Lato,x,/Theme/Blobby,12.5\n\
             Lato,,/Expressive/Calm,0.3x\n",
        );
        let rows: Vec<Option<FontTagRow>> = stream_font_tags(&path)
            .expect("open stream")
            .collect::<Result<_, _>>()
            .expect("stream rows");
        assert_eq!(rows.len(), 5);
        assert_eq!(
            rows[0],
            Some(FontTagRow {
                family: "Roboto".to_string(),
                tag: "/Expressive/Calm".to_string(),
                value: 80.0,
            })
        );
        assert_eq!(rows[1], None);
        assert_eq!(rows[2], None);
        assert!(rows[3].is_some());
        assert_eq!(rows[4], None, "a numeric prefix with trailing text is malformed");
    }

    #[test]
    fn variant_tag_rows_parse_style_weight() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_csv(
            dir.path(),
            "quant.csv",
            "Abhaya Libre,wght@400,/Quant/Width,55\n\
             Abhaya Libre,ital@700,/Quant/Width,60\n\
             Abhaya Libre,,/Quant/Width,60\n",
        );
        let rows: Vec<Option<VariantTagRow>> = stream_variant_tags(&path)
            .expect("open stream")
            .collect::<Result<_, _>>()
            .expect("stream rows");
        let first = rows[0].as_ref().expect("first row usable");
        assert_eq!((first.style, first.weight), (FontStyle::Normal, 400));
        let second = rows[1].as_ref().expect("second row usable");
        assert_eq!((second.style, second.weight), (FontStyle::Italic, 700));
        assert_eq!(rows[2], None);
    }

    #[test]
    fn missing_csv_is_fatal() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = stream_font_tags(&dir.path().join("absent.csv"))
            .err()
            .expect("missing file should fail");
        assert!(matches!(err, CatalogError::Csv { .. }));
    }
}
