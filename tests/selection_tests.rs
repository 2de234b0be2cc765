//! Batch selection from query files, filtered dump output and archive
//! extraction.

mod common;

use common::*;
use pretty_assertions::assert_eq;
use std::io::Cursor;
use taxforest::bio::taxonomy::{
    extract_taxdump, parse_selection, Ambiguity, RejectAmbiguous, SelectionFile, TaxonId,
};
use taxforest::core::config::{OutputConfig, TaxonomyConfig};
use taxforest::core::filter::write_filtered_dumps;
use taxforest::core::selection::{select_descendants, Query, QuerySet, SelectionOptions};
use taxforest::TaxforestError;

fn ids(values: &[u32]) -> Vec<TaxonId> {
    values.iter().copied().map(TaxonId).collect()
}

fn queries(text: &str) -> QuerySet {
    QuerySet::parse(Cursor::new(text.to_string()), true).unwrap()
}

#[test]
fn test_mixed_queries_select_union() {
    let taxonomy = TaxdumpFixture::sample().load();
    let mut chooser = RejectAmbiguous;

    let report = select_descendants(
        &taxonomy,
        &queries("Homo\n10239\nBacillus cereus (taxid 1396)\n"),
        &mut chooser,
        &SelectionOptions::default(),
    )
    .unwrap();

    assert_eq!(report.taxa, ids(&[1396, 9605, 9606, 10239]));
    assert_eq!(report.resolved.len(), 3);
    assert!(report.skipped.is_empty());
}

#[test]
fn test_unanswered_homonym_is_skipped_not_guessed() {
    let taxonomy = TaxdumpFixture::sample().load();
    let mut chooser = SelectionFile::new();

    let report = select_descendants(
        &taxonomy,
        &queries("Bacillus\nHomo sapiens\n"),
        &mut chooser,
        &SelectionOptions::default(),
    )
    .unwrap();

    assert_eq!(report.taxa, ids(&[9606]));
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].query, Query::Name("Bacillus".to_string()));
}

#[test]
fn test_bad_choice_skips_only_that_query() {
    let taxonomy = TaxdumpFixture::sample().load();
    let set = queries("Bacillus\nHomo sapiens\n");

    let mut outside = SelectionFile::new().with_selection("Bacillus", ids(&[9606]));
    let report =
        select_descendants(&taxonomy, &set, &mut outside, &SelectionOptions::default()).unwrap();
    assert_eq!(report.taxa, ids(&[9606]));
    assert_eq!(report.skipped.len(), 1);

    let mut mistyped = |ambiguity: &Ambiguity| parse_selection(&ambiguity.name, "1386x");
    let report =
        select_descendants(&taxonomy, &set, &mut mistyped, &SelectionOptions::default()).unwrap();
    assert_eq!(report.taxa, ids(&[9606]));
    assert_eq!(report.skipped[0].query, Query::Name("Bacillus".to_string()));
    assert!(report.skipped[0].reason.contains("1386x"));
}

#[test]
fn test_unknown_name_fails_unless_skipped() {
    let taxonomy = TaxdumpFixture::sample().load();
    let mut chooser = RejectAmbiguous;
    let set = queries("Homo sapiens\nNotataxon\n");

    let err = select_descendants(&taxonomy, &set, &mut chooser, &SelectionOptions::default())
        .unwrap_err();
    assert!(matches!(err, TaxforestError::NameNotFound(name) if name == "Notataxon"));

    let options = SelectionOptions {
        skip_unresolved: true,
        ..SelectionOptions::default()
    };
    let report = select_descendants(&taxonomy, &set, &mut chooser, &options).unwrap();
    assert_eq!(report.taxa, ids(&[9606]));
    assert_eq!(report.skipped.len(), 1);
}

#[test]
fn test_selection_filters_apply_after_closure() {
    let taxonomy = TaxdumpFixture::sample().load();
    let mut chooser = SelectionFile::new().with_selection("Bacillus", ids(&[1386, 55087]));

    let species = select_descendants(
        &taxonomy,
        &queries("Bacillus\n"),
        &mut chooser,
        &SelectionOptions {
            division: Some("species".to_string()),
            ..SelectionOptions::default()
        },
    )
    .unwrap();
    assert_eq!(species.taxa, ids(&[1396, 1423, 13132]));

    let terminal = select_descendants(
        &taxonomy,
        &queries("2759\n"),
        &mut chooser,
        &SelectionOptions {
            terminal_only: true,
            ..SelectionOptions::default()
        },
    )
    .unwrap();
    assert_eq!(terminal.taxa, ids(&[9606, 13132]));
}

#[test]
fn test_query_file_on_disk() {
    let fixture = TaxdumpFixture::sample();
    let path = fixture.join("queries.txt");
    std::fs::write(&path, "Bacteria\n\n  Viruses  \n").unwrap();

    let set = QuerySet::from_file(&path, true).unwrap();
    assert_eq!(set.len(), 2);

    let missing = QuerySet::from_file(fixture.join("absent.txt"), true).unwrap_err();
    assert!(matches!(missing, TaxforestError::NotFound(_)));
}

#[test]
fn test_filtered_dumps_hold_selected_subtree() {
    let fixture = TaxdumpFixture::sample();
    let taxonomy = fixture.load();
    let selected = taxonomy.forest().descendants(TaxonId(9605)).unwrap();

    let out = fixture.join("filtered");
    let summary = write_filtered_dumps(
        &fixture.files(),
        &selected,
        &out,
        &TaxonomyConfig::default(),
        &OutputConfig::default(),
    )
    .unwrap();

    assert_eq!(summary.nodes_written, 2);
    assert_eq!(summary.names_written, 2);
    assert_eq!(
        std::fs::read_to_string(out.join("nodes2.dmp")).unwrap(),
        format!("{}{}", nodes_line(9605, 2759, "genus"), nodes_line(9606, 9605, "species"))
    );
    assert_eq!(
        std::fs::read_to_string(out.join("names2.dmp")).unwrap(),
        format!(
            "{}{}",
            names_line(9605, "Homo", "scientific name"),
            names_line(9606, "Homo sapiens", "scientific name")
        )
    );
}

#[test]
fn test_extract_taxdump_archive() {
    let fixture = TaxdumpFixture::sample();
    let archive = fixture.join("taxdump.tar.gz");
    let nodes = nodes_text(SAMPLE_NODES);
    let names = names_text(SAMPLE_NAMES);
    write_taxdump_archive(
        &archive,
        &[
            ("citations.dmp", ""),
            ("nodes.dmp", nodes.as_str()),
            ("names.dmp", names.as_str()),
            ("readme.txt", "taxdump"),
        ],
    );

    let dest = fixture.join("extracted");
    let files = extract_taxdump(&archive, &dest).unwrap();

    assert_eq!(files.nodes, dest.join("nodes.dmp"));
    assert_eq!(std::fs::read_to_string(&files.names).unwrap(), names);
    assert!(!dest.join("readme.txt").exists());

    let taxonomy =
        taxforest::Taxonomy::load_files(&files, &TaxonomyConfig::default()).unwrap();
    assert_eq!(taxonomy.forest().len(), SAMPLE_NODES.len());
}

#[test]
fn test_archive_without_dumps_is_rejected() {
    let fixture = TaxdumpFixture::sample();
    let archive = fixture.join("empty.tar.gz");
    write_taxdump_archive(&archive, &[("readme.txt", "nothing here")]);

    let err = extract_taxdump(&archive, fixture.join("out")).unwrap_err();
    assert!(matches!(err, TaxforestError::NotFound(_)));
}
