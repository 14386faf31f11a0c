use std::fs;
use std::path::{Path, PathBuf};

use gfonts_core::catalog::{CatalogError, write_icon_catalog};
use gfonts_core::control::{ControlError, FontsControlPlane, LoadReport};
use gfonts_core::layout::{
    DataLayout,
    FONT_TAGS_FILE,
    ICON_FONT_DIR,
    ICON_SOURCE_DIR,
    ICON_VARIABLE_FONT_DIR,
    TAG_METADATA_FILE,
    VARIANT_TAGS_FILE,
};
use gfonts_core::store::{FontFilter, IconFilter, SqliteFontStore};

const ICON_STYLES: [&str; 3] = ["materialicons", "materialiconsoutlined", "materialiconsround"];

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

fn copy_fixture(name: &str, target: &Path) {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).expect("create fixture directory");
    }
    fs::copy(fixture_path(name), target).unwrap_or_else(|err| {
        let target_display = target.display();
        panic!("failed to copy fixture {name} to {target_display}: {err}")
    });
}

fn touch(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create asset directory");
    }
    fs::write(path, content).expect("write asset");
}

/// Lays out a complete data root: catalog, tag CSVs, icon tree and codepoints.
fn seed_layout(root: &Path) -> DataLayout {
    let layout = DataLayout::new(root);
    copy_fixture("google-fonts.json", &layout.font_catalog());
    copy_fixture("tags_metadata.csv", &root.join(TAG_METADATA_FILE));
    copy_fixture("families.csv", &root.join(FONT_TAGS_FILE));
    copy_fixture("quant.csv", &root.join(VARIANT_TAGS_FILE));

    let icons = root.join(ICON_SOURCE_DIR);
    for style in ICON_STYLES {
        for file in ["20px.svg", "24px.svg"] {
            touch(&icons.join("action").join("home").join(style).join(file), "<svg/>");
        }
    }
    touch(
        &icons.join("action").join("search").join("materialicons").join("24px.svg"),
        "<svg/>",
    );
    touch(&icons.join(".DS_Store"), "");
    touch(
        &root.join(ICON_FONT_DIR).join("MaterialIcons-Regular.codepoints"),
        "home e88a\nsearch e8b6\n\nmalformed\n",
    );
    touch(
        &root.join(ICON_VARIABLE_FONT_DIR).join("MaterialSymbols.codepoints"),
        "settings e8b8\n",
    );

    let collected = layout.icon_collector().collect().expect("collect icons");
    write_icon_catalog(&collected, &layout.icon_catalog()).expect("write icon catalog");
    layout
}

async fn build(layout: &DataLayout) -> (FontsControlPlane, LoadReport) {
    FontsControlPlane::build_database(layout.build_inputs(), layout.database())
        .await
        .expect("build database")
}

fn names(fonts: &[gfonts_store::models::Font]) -> Vec<&str> {
    fonts.iter().map(|font| font.family.as_str()).collect()
}

#[tokio::test]
async fn build_loads_every_table() {
    let dir = tempfile::tempdir().expect("tempdir");
    let layout = seed_layout(dir.path());
    let (control, report) = build(&layout).await;

    assert_eq!(report.fonts.inserted, 2);
    assert_eq!(report.fonts.duplicates, 1);
    assert_eq!(report.variants.inserted, 6);
    assert_eq!(report.variants.malformed, 1);
    assert_eq!(report.tags.inserted, 2);
    assert_eq!(report.tags.malformed, 1);
    assert_eq!(report.font_tags.inserted, 3);
    assert_eq!(report.font_tags.duplicates, 1);
    assert_eq!(report.font_tags.unresolved, 2);
    assert_eq!(report.font_tags.malformed, 1);
    assert_eq!(report.variant_tags.inserted, 3);
    assert_eq!(report.variant_tags.unresolved, 1);
    assert_eq!(report.variant_tags.malformed, 1);
    assert_eq!(report.icons.inserted, 2);
    assert_eq!(report.icon_variants.inserted, 7);

    let stats = control.database_stats().await.expect("stats");
    assert_eq!((stats.fonts, stats.variants, stats.icons), (2, 6, 2));
    assert_eq!(control.orphan_counts().await.expect("orphans").total(), 0);
}

#[tokio::test]
async fn duplicate_family_keeps_first_record() {
    let dir = tempfile::tempdir().expect("tempdir");
    let layout = seed_layout(dir.path());
    let (control, _) = build(&layout).await;

    let (font, variants, tags) = control
        .font_details("Roboto".to_string())
        .await
        .expect("details")
        .expect("Roboto is stored");
    assert_eq!(font.category.as_deref(), Some("sans-serif"));
    assert_eq!(font.subsets.as_deref(), Some("cyrillic,latin"));
    assert!(font.is_variable);

    let labels: Vec<&str> = variants.iter().map(|variant| variant.name.as_str()).collect();
    assert_eq!(labels, vec!["regular", "italic", "700", "700italic", "900"]);
    let bold_italic = &variants[3];
    assert_eq!((bold_italic.style.as_str(), bold_italic.weight), ("italic", 700));
    assert_eq!(
        bold_italic.url.as_deref(),
        Some("https://fonts.example.test/roboto/700italic.ttf")
    );

    let calm = tags
        .iter()
        .find(|tag| tag.name == "/Expressive/Calm")
        .expect("calm tag attached");
    assert!((calm.value - 80.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn variant_tags_resolve_by_weight_and_style() {
    let dir = tempfile::tempdir().expect("tempdir");
    let layout = seed_layout(dir.path());
    let (control, _) = build(&layout).await;

    let store = control.store();
    let font = store
        .font_by_family("Roboto")
        .expect("lookup")
        .expect("Roboto is stored");
    let variants = store.variants_for_font(font.id).expect("variants");
    let bold_italic = variants
        .iter()
        .find(|variant| variant.name == "700italic")
        .expect("700italic stored");
    let tags = store.tags_for_variant(bold_italic.id).expect("variant tags");
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].name, "/Expressive/Loud");
}

#[tokio::test]
async fn font_searches_filter_and_deduplicate() {
    let dir = tempfile::tempdir().expect("tempdir");
    let layout = seed_layout(dir.path());
    let (control, _) = build(&layout).await;

    let by_name = control
        .search_fonts(FontFilter {
            name: Some("rObOtO".to_string()),
            ..FontFilter::default()
        })
        .await
        .expect("search by name");
    assert_eq!(names(&by_name), vec!["Roboto"]);

    let variable = control
        .search_fonts(FontFilter {
            is_variable: Some(true),
            ..FontFilter::default()
        })
        .await
        .expect("search variable");
    assert_eq!(names(&variable), vec!["Roboto"]);

    let loud = control
        .search_fonts(FontFilter {
            tag: Some("Loud".to_string()),
            ..FontFilter::default()
        })
        .await
        .expect("search by tag");
    assert_eq!(names(&loud), vec!["Roboto", "Lobster"]);

    let expressive = control
        .search_fonts(FontFilter {
            tag: Some("/Expressive/".to_string()),
            ..FontFilter::default()
        })
        .await
        .expect("search by shared tag prefix");
    assert_eq!(names(&expressive), vec!["Roboto", "Lobster"]);

    let calm_static = control
        .search_fonts(FontFilter {
            tag: Some("Calm".to_string()),
            is_variable: Some(false),
            ..FontFilter::default()
        })
        .await
        .expect("search combined");
    assert!(calm_static.is_empty());
}

#[tokio::test]
async fn hostile_filter_is_bound_as_data() {
    let dir = tempfile::tempdir().expect("tempdir");
    let layout = seed_layout(dir.path());
    let (control, _) = build(&layout).await;
    let before = control.database_stats().await.expect("stats");

    let fonts = control
        .search_fonts(FontFilter {
            name: Some("'; DROP TABLE fonts; --".to_string()),
            ..FontFilter::default()
        })
        .await
        .expect("search with hostile input");
    assert!(fonts.is_empty());
    assert_eq!(control.database_stats().await.expect("stats"), before);
}

#[tokio::test]
async fn icons_carry_paths_and_codepoints() {
    let dir = tempfile::tempdir().expect("tempdir");
    let layout = seed_layout(dir.path());
    let (control, _) = build(&layout).await;

    let icons = control
        .search_icons(IconFilter {
            name: Some("home".to_string()),
            category: Some("act".to_string()),
        })
        .await
        .expect("search icons");
    assert_eq!(icons.len(), 1);
    assert_eq!(icons[0].codepoint.as_deref(), Some("e88a"));

    let variants = control
        .store()
        .icon_variants_for_icon(icons[0].id)
        .expect("icon variants");
    assert_eq!(variants.len(), 6);
    for variant in &variants {
        assert!(variant.path.starts_with(&format!("action/home/{}/", variant.style)));
    }
    assert!(
        variants
            .iter()
            .any(|variant| variant.path == "action/home/materialiconsround/24px.svg")
    );

    let styles: Vec<String> = control
        .icon_styles()
        .await
        .expect("styles")
        .into_iter()
        .map(|style| style.style)
        .collect();
    assert_eq!(styles, ICON_STYLES.map(str::to_string).to_vec());

    let categories = control.icon_categories().await.expect("categories");
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].category.as_deref(), Some("action"));
}

#[tokio::test]
async fn rebuild_replaces_previous_store() {
    let dir = tempfile::tempdir().expect("tempdir");
    let layout = seed_layout(dir.path());
    let (first, _) = build(&layout).await;
    let first_stats = first.database_stats().await.expect("stats");
    drop(first);

    let (second, _) = build(&layout).await;
    assert_eq!(second.database_stats().await.expect("stats"), first_stats);
}

#[tokio::test]
async fn missing_input_leaves_existing_store() {
    let dir = tempfile::tempdir().expect("tempdir");
    let layout = seed_layout(dir.path());
    let (control, _) = build(&layout).await;
    let stats = control.database_stats().await.expect("stats");
    drop(control);

    fs::remove_file(dir.path().join(VARIANT_TAGS_FILE)).expect("remove quant.csv");
    let err = FontsControlPlane::build_database(layout.build_inputs(), layout.database())
        .await
        .expect_err("missing input should fail");
    assert!(matches!(err, ControlError::Catalog(CatalogError::Io { .. })));

    let store = SqliteFontStore::open_read_only(&layout.database()).expect("store still present");
    assert_eq!(store.database_stats().expect("stats"), stats);
}
