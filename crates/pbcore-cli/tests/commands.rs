//! End-to-end tests for the subcommand implementations.

use std::fs;

use pbcore_cli::cli::{BiografArgs, OutputArgs, Tv2Args};
use pbcore_cli::commands::{run_biograf, run_tv2};
use tempfile::TempDir;

const TV2_ROWS: &str = "\
1995-03,Mad og drikke,Øl,Tuborg Grøn,45,Tuborg,950312,Tuborg A/S,Bureau A/S,Nordisk Film,Dansk,tv2_0312_tuborg
1995-04,Transport,Biler,Folkevognen,30,,senere,VW,,,Ukendt,tv2_0401_vw
1995-04,Mad og drikke,Kaffe,Merrild,25,,950402,Merrild,,,Dansk,tv2_0402_merrild
";

#[test]
fn tv2_batch_writes_survivors_and_report() {
    let workdir = TempDir::new().unwrap();
    let input = workdir.path().join("spots.csv");
    fs::write(&input, TV2_ROWS).unwrap();
    let output_dir = workdir.path().join("out");
    let report = workdir.path().join("report.json");

    let args = Tv2Args {
        input,
        output: OutputArgs {
            output_dir: output_dir.clone(),
            report: Some(report.clone()),
        },
    };
    let summary = run_tv2(&args).unwrap();
    assert_eq!(summary.written, 2);
    assert_eq!(summary.failed, 1);

    assert!(output_dir.join("tv2_0312_tuborg.xml").is_file());
    assert!(output_dir.join("tv2_0402_merrild.xml").is_file());
    assert!(!output_dir.join("tv2_0401_vw.xml").exists());

    let parsed: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(parsed["written"], 2);
    assert!(!parsed["reports"][1]["error"].as_str().unwrap().is_empty());
}

#[test]
fn biograf_batch_maps_an_export_directory() {
    let workdir = TempDir::new().unwrap();
    let export = workdir.path().join("export");
    fs::create_dir(&export).unwrap();
    fs::write(
        export.join("advertisements.csv"),
        "2841,Tuborg Påskebryg,,Øl,Kort side 1,Kort side 2,,1954-11-30,1954-12-24,123,\
         30 m,C-1234,4321,registrator,1999-01-01,,,R-99,tuborg+paaskebryg.mpg,København\n",
    )
    .unwrap();
    fs::write(
        export.join("agents.csv"),
        "2841,Instruktør,Jørgen Roos\n2841,Producent,Nordisk Film\n",
    )
    .unwrap();
    fs::write(export.join("subjects.csv"), "2841,Øl og vand,Drikkevarer\n").unwrap();
    fs::write(export.join("keywords.csv"), "2841,påske\n").unwrap();
    fs::write(export.join("decades.csv"), "2841,1950-59\n").unwrap();
    fs::write(export.join("languages.csv"), "2841,dan\n").unwrap();

    let output_dir = workdir.path().join("out");
    let args = BiografArgs {
        input: export,
        output: OutputArgs {
            output_dir: output_dir.clone(),
            report: None,
        },
    };
    let summary = run_biograf(&args).unwrap();
    assert_eq!(summary.written, 1);
    assert_eq!(summary.failed, 0);

    let document = fs::read_to_string(output_dir.join("tuborg paaskebryg.xml")).unwrap();
    assert!(document.contains("Jørgen Roos"));
    assert!(document.contains("censordate: 1954-11-30"));
    assert!(document.contains("1950-59"));
}

#[test]
fn missing_export_table_fails_the_run() {
    let workdir = TempDir::new().unwrap();
    let export = workdir.path().join("incomplete");
    fs::create_dir(&export).unwrap();
    fs::write(export.join("advertisements.csv"), "").unwrap();

    let args = BiografArgs {
        input: export,
        output: OutputArgs {
            output_dir: workdir.path().join("out"),
            report: None,
        },
    };
    assert!(run_biograf(&args).is_err());
}
