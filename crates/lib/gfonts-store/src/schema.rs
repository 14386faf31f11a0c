pub const TABLE_FONTS: &str = "fonts";
pub const TABLE_VARIANTS: &str = "variants";
pub const TABLE_TAGS: &str = "tags";
pub const TABLE_FONT_TAGS: &str = "font_tags";
pub const TABLE_VARIANT_TAGS: &str = "variant_tags";
pub const TABLE_ICONS: &str = "icons";
pub const TABLE_ICON_VARIANTS: &str = "icon_variants";

/// Variant label used when a catalog font omits `defaultVariant`.
pub const DEFAULT_VARIANT: &str = "regular";
/// Format label recorded for every font variant.
pub const VARIANT_FORMAT: &str = "woff2";
/// Weight assigned to the `regular` and `italic` variant labels.
pub const DEFAULT_WEIGHT: i64 = 400;

pub const STYLE_NORMAL: &str = "normal";
pub const STYLE_ITALIC: &str = "italic";

/// Relational schema for the font and icon store.
///
/// Only primary keys and the unique family/name columns are declared. The
/// `(font_id, weight, style)` triple on `variants` is looked up as a natural
/// key but is not constrained.
pub const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS fonts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        family TEXT NOT NULL UNIQUE,
        subsets TEXT,
        category TEXT,
        version TEXT,
        last_modified TEXT,
        default_variant TEXT,
        is_variable BOOLEAN
    );

    CREATE TABLE IF NOT EXISTS variants (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        font_id INTEGER,
        name TEXT NOT NULL,
        style TEXT NOT NULL,
        weight INTEGER NOT NULL,
        local_path TEXT,
        url TEXT,
        format TEXT,
        FOREIGN KEY (font_id) REFERENCES fonts (id)
    );

    CREATE TABLE IF NOT EXISTS tags (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        description TEXT
    );

    CREATE TABLE IF NOT EXISTS font_tags (
        font_id INTEGER,
        tag_id INTEGER,
        value REAL,
        FOREIGN KEY (font_id) REFERENCES fonts (id),
        FOREIGN KEY (tag_id) REFERENCES tags (id),
        PRIMARY KEY (font_id, tag_id)
    );

    CREATE TABLE IF NOT EXISTS variant_tags (
        variant_id INTEGER,
        tag_id INTEGER,
        value REAL,
        FOREIGN KEY (variant_id) REFERENCES variants (id),
        FOREIGN KEY (tag_id) REFERENCES tags (id),
        PRIMARY KEY (variant_id, tag_id)
    );

    CREATE TABLE IF NOT EXISTS icons (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        category TEXT,
        codepoint TEXT
    );

    CREATE TABLE IF NOT EXISTS icon_variants (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        icon_id INTEGER,
        style TEXT NOT NULL,
        path TEXT NOT NULL,
        FOREIGN KEY (icon_id) REFERENCES icons (id)
    );
";

/// Builds the relative asset path recorded for an icon file.
#[must_use]
pub fn make_icon_path(category: &str, icon_name: &str, style: &str, file_name: &str) -> String {
    format!("{category}/{icon_name}/{style}/{file_name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icon_path_uses_forward_slashes() {
        assert_eq!(
            make_icon_path("action", "search", "materialicons", "24px.svg"),
            "action/search/materialicons/24px.svg"
        );
    }

    #[test]
    fn schema_declares_every_table() {
        for table in [
            TABLE_FONTS,
            TABLE_VARIANTS,
            TABLE_TAGS,
            TABLE_FONT_TAGS,
            TABLE_VARIANT_TAGS,
            TABLE_ICONS,
            TABLE_ICON_VARIANTS,
        ] {
            let needle = format!("CREATE TABLE IF NOT EXISTS {table} (");
            assert!(SCHEMA.contains(&needle), "schema should declare {table}");
        }
    }
}
