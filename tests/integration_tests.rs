//! End-to-end tests: spreadsheet in, computed batch out, history round-trip.

use std::fs;
use std::path::Path;

use cushion_calc::generator::{write_csv, write_json};
use cushion_calc::store::{load_history, save_batch};
use cushion_calc::{
    calculate_all_widths, export_rows, generate_sku, process_file, read_rows, Batch, CalcConfig,
    DimensionDetector, FabricKind, ItemQuery, Orientation,
};
use pretty_assertions::assert_eq;

const SAMPLE_CSV: &str = "\
Referencia;Ancho (cm);Alto (cm);Tejido
COJ-001;40;50;Loneta
COJ-002;45;45;Lino
SIN-MEDIDA;;;Terciopelo
COJ-003;150;30;Loneta
COJ-004;60;30;Algodón
";

fn write_sample(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("cojines.csv");
    fs::write(&path, SAMPLE_CSV).unwrap();
    path
}

#[test]
fn test_process_file_detects_and_computes() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_sample(dir.path());

    let (batch, report) = process_file(&input, &CalcConfig::new(FabricKind::Patterned)).unwrap();

    assert!(report.passed);
    assert_eq!(batch.items.len(), 4);
    assert_eq!(batch.skipped_rows, vec![2]);

    let first = &batch.items[0];
    assert_eq!((first.width, first.height), (40.0, 50.0));
    let r = &first.results[&280];
    assert_eq!(r.plates_per_row, 6);
    assert_eq!(r.cushions_per_strip, 3.0);
    assert!((r.consumption_m - 0.183333).abs() < 0.0001);

    // 150 cm plus margin does not fit on 140 cm with patterned fabric.
    assert!(!batch.items[2].results[&140].is_valid);
    assert!(report.warnings.iter().any(|w| w.contains("only fits from 160 cm")));
}

#[test]
fn test_policy_change_recomputes_everything() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_sample(dir.path());

    let (mut batch, _) = process_file(&input, &CalcConfig::new(FabricKind::Patterned)).unwrap();
    batch.apply_policy(FabricKind::Plain);

    for item in &batch.items {
        assert_eq!(
            item.results,
            calculate_all_widths(item.width, item.height, FabricKind::Plain)
        );
    }
    assert_eq!(batch.items[2].results[&140].orientation, Orientation::Rotated);
    assert!(batch.items[2].results[&140].is_valid);
}

#[test]
fn test_export_then_reimport_reproduces_results() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_sample(dir.path());
    let config = CalcConfig::new(FabricKind::Plain);

    let (batch, _) = process_file(&input, &config).unwrap();
    let exported = dir.path().join("export.csv");
    write_csv(&export_rows(&batch.items), fs::File::create(&exported).unwrap()).unwrap();

    let rows = read_rows(&exported).unwrap();
    let reloaded = Batch::from_rows(rows, &DimensionDetector::default(), config.fabric);

    assert_eq!(reloaded.items.len(), batch.items.len());
    for (before, after) in batch.items.iter().zip(&reloaded.items) {
        assert_eq!(before.width, after.width);
        assert_eq!(before.height, after.height);
        assert_eq!(before.results, after.results);
    }
}

#[test]
fn test_history_round_trip_recomputes() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_sample(dir.path());
    let history = dir.path().join("history.json");

    let (batch, _) = process_file(&input, &CalcConfig::new(FabricKind::Plain)).unwrap();
    let saved = save_batch(&history, &batch.items, "Lote prueba").unwrap();
    assert_eq!(saved.len(), 4);

    let stored = fs::read_to_string(&history).unwrap();
    assert!(!stored.contains("consumption_m"));

    let reloaded = load_history(&history, FabricKind::Plain).unwrap();
    assert_eq!(reloaded.len(), batch.items.len());
    for item in &reloaded {
        let original = batch
            .items
            .iter()
            .find(|b| b.original_row == item.original_row)
            .expect("original row preserved");
        assert_eq!(original.results, item.results);
        assert!(item.id.starts_with("db-"));
    }
}

#[test]
fn test_json_input_and_query() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("rows.json");
    fs::write(
        &input,
        r#"[{"w": 50, "h": 30, "other": "text"}, {"ancho": 40, "alto": 40}]"#,
    )
    .unwrap();

    let (batch, _) = process_file(&input, &CalcConfig::default()).unwrap();
    assert_eq!(batch.items.len(), 2);

    let query = ItemQuery {
        search: Some("40x40".to_string()),
        ..Default::default()
    };
    let found = query.apply(&batch.items);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].results[&280].consumption_m, 0.15);

    let mut buf = Vec::new();
    write_json(&export_rows(found), &mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    assert!(text.contains("\"Tela_280cm_Consumo_M\": 0.15"));
}

#[test]
fn test_unusable_file_fails_validation() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("nothing.csv");
    fs::write(&input, "Referencia,Color\nA,rojo\n").unwrap();

    let (batch, report) = process_file(&input, &CalcConfig::default()).unwrap();
    assert!(batch.is_empty());
    assert!(!report.passed);
}

#[test]
fn test_sku_reference_description() {
    let code = generate_sku("Cinta adhesiva doble cara 25mm", "CNSM");
    assert!(code.len() <= 10);
    assert_eq!(&code[..4], "CNSM");
    assert_eq!(code, generate_sku("Cinta adhesiva doble cara 25mm", "CNSM"));
}
