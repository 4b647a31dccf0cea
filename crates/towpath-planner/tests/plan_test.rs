use towpath_core::{
    HelicalLayer, HoopLayer, Layer, MandrelParameters, SkipLayer, TowParameters, WindDefinition,
    PARAMETERS_PREFIX,
};
use towpath_planner::{plan_wind, LayerError, PlanError, PlanOptions};

fn definition(layers: Vec<Layer>) -> WindDefinition {
    WindDefinition {
        layers,
        mandrel_parameters: MandrelParameters {
            diameter: 70.0,
            wind_length: 100.0,
        },
        tow_parameters: TowParameters {
            width: 7.0,
            thickness: 0.5,
        },
        default_feed_rate: 9000.0,
    }
}

fn helical() -> HelicalLayer {
    HelicalLayer {
        wind_angle: 45.0,
        pattern_number: 3,
        skip_index: 2,
        lock_degrees: 5.0,
        lead_in_mm: 10.0,
        lead_out_degrees: 5.0,
        skip_initial_near_lock: None,
    }
}

#[test]
fn hoop_program_has_header_and_end_marker() {
    let definition = definition(vec![Layer::Hoop(HoopLayer { terminal: true })]);
    let result = plan_wind(&definition, &PlanOptions::default()).unwrap();

    assert!(result.commands[0].starts_with(PARAMETERS_PREFIX));
    assert!(result.commands.last().unwrap().starts_with("M2"));
    assert_eq!(&result.commands[1..4], ["G21", "G90", "G0 F9000"]);

    let motion_lines = result
        .commands
        .iter()
        .filter(|line| !line.starts_with(';'))
        .count();
    assert_eq!(result.commands_total, motion_lines);
    assert!(result.commands.iter().all(|line| !line.is_empty()));
}

#[test]
fn each_layer_gets_a_summary_comment() {
    let definition = definition(vec![
        Layer::Hoop(HoopLayer { terminal: false }),
        Layer::Skip(SkipLayer {
            mandrel_rotation: 90.0,
        }),
        Layer::Hoop(HoopLayer { terminal: true }),
    ]);
    let result = plan_wind(&definition, &PlanOptions::default()).unwrap();

    assert!(result.commands.contains(&"; Layer 1/3: hoop".to_string()));
    assert!(result
        .commands
        .contains(&"; Layer 2/3: skip 90 degrees".to_string()));
    assert!(result
        .commands
        .contains(&"; Layer 3/3: hoop (terminal)".to_string()));
    assert_eq!(result.layers.len(), 3);
    assert_eq!(result.layers[1].wind_type, "skip");
}

#[test]
fn helical_layer_plans_full_coverage() {
    let definition = definition(vec![Layer::Helical(helical())]);
    let result = plan_wind(&definition, &PlanOptions::default()).unwrap();

    assert!(result
        .commands
        .iter()
        .any(|line| line.starts_with("; Helical: 24 circuits")));
    assert!(result.total_time_s > 0.0);
    assert!(result.total_tow_m > 0.0);
    // 24 circuits of 100 mm passes each way lay at least 4.8 m of tow.
    assert!(result.total_tow_m > 4.8);
}

#[test]
fn bad_helical_pattern_fails_with_layer_context() {
    let definition = definition(vec![
        Layer::Hoop(HoopLayer { terminal: false }),
        Layer::Helical(HelicalLayer {
            skip_index: 1,
            ..helical()
        }),
    ]);
    let err = plan_wind(&definition, &PlanOptions::default()).unwrap_err();
    match err {
        PlanError::Layer { index, source } => {
            assert_eq!(index, 2);
            assert!(matches!(source, LayerError::IncompleteCoverage { .. }));
        }
        other => panic!("expected layer error, got {other}"),
    }
}

#[test]
fn verbose_plans_carry_move_traces() {
    let definition = definition(vec![Layer::Hoop(HoopLayer { terminal: true })]);
    let quiet = plan_wind(&definition, &PlanOptions::default()).unwrap();
    let verbose = plan_wind(
        &definition,
        &PlanOptions {
            verbose: true,
            ..PlanOptions::default()
        },
    )
    .unwrap();

    assert!(verbose.commands.iter().any(|line| line.starts_with("; Move ")));
    // Verbosity adds comments only; the accounted motion is identical.
    assert_eq!(quiet.commands_total, verbose.commands_total);
    assert_eq!(quiet.total_time_s, verbose.total_time_s);
}
