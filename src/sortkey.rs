//! Sort-key codec: decodes the fixed `<order>:<data-type>:<case-order>`
//! triplet of `--sort` into a normalized descriptor. Unrecognized letters
//! leave an axis unset, which omits the attribute and defers to the engine's
//! own default for that axis.

use crate::error::UsageError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDataType {
    Number,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortCaseOrder {
    UpperFirst,
    LowerFirst,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortKeySpec {
    pub order: Option<SortOrder>,
    pub data_type: Option<SortDataType>,
    pub case_order: Option<SortCaseOrder>,
}

impl SortKeySpec {
    /// Attribute name/value pairs for the axes that are set, in the order
    /// they appear on the generated `xsl:sort`.
    pub fn attribute_pairs(&self) -> Vec<(&'static str, &'static str)> {
        let mut pairs = Vec::new();
        match self.order {
            Some(SortOrder::Ascending) => pairs.push(("order", "ascending")),
            Some(SortOrder::Descending) => pairs.push(("order", "descending")),
            None => {}
        }
        match self.data_type {
            Some(SortDataType::Number) => pairs.push(("data-type", "number")),
            Some(SortDataType::Text) => pairs.push(("data-type", "text")),
            None => {}
        }
        match self.case_order {
            Some(SortCaseOrder::UpperFirst) => pairs.push(("case-order", "upper-first")),
            Some(SortCaseOrder::LowerFirst) => pairs.push(("case-order", "lower-first")),
            None => {}
        }
        pairs
    }
}

/// Parses a sort triplet token. The token must scan as exactly three single
/// characters separated by two colons.
pub fn parse(token: &str) -> Result<SortKeySpec, UsageError> {
    let mut fields = [' '; 3];
    let mut count = 0;
    for part in token.split(':') {
        let mut chars = part.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if count < 3 => {
                fields[count] = c;
                count += 1;
            }
            _ => return Err(UsageError::InvalidSortSpec(token.to_string())),
        }
    }
    if count != 3 {
        return Err(UsageError::InvalidSortSpec(token.to_string()));
    }

    Ok(SortKeySpec {
        order: match fields[0] {
            'A' => Some(SortOrder::Ascending),
            'D' => Some(SortOrder::Descending),
            _ => None,
        },
        data_type: match fields[1] {
            'N' => Some(SortDataType::Number),
            'T' => Some(SortDataType::Text),
            _ => None,
        },
        case_order: match fields[2] {
            'U' => Some(SortCaseOrder::UpperFirst),
            'L' => Some(SortCaseOrder::LowerFirst),
            _ => None,
        },
    })
}
