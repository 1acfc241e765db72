use crate::support::{emit_reply, yes_no};
use serde_json::json;
use timetable_engine::{Reply, SeedOutcome, Timetable, TimetableConfig};

pub fn run(config: &TimetableConfig, json_output: bool) {
    let timetable = Timetable::from_config(config);
    let outcome = match timetable.initialize() {
        Ok(outcome) => outcome,
        Err(err) => return emit_reply(&Reply::rejected(&err), json_output),
    };

    if json_output {
        let payload = json!({
            "action": "init",
            "storePath": timetable.store_path().display().to_string(),
            "outcome": outcome,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("json serialization")
        );
    } else {
        print_outcome(&timetable, &outcome);
    }
}

fn print_outcome(timetable: &Timetable, outcome: &SeedOutcome) {
    println!("timetable init");
    println!();
    println!("  store path: {}", timetable.store_path().display());
    println!("  created store: {}", yes_no(outcome.created_store));
    println!("  classrooms: {}", outcome.classrooms);
    if outcome.created.is_empty() {
        println!("  seeded: none");
    } else {
        let rooms: Vec<String> = outcome
            .created
            .iter()
            .map(|room| format!("{} (capacity {})", room.number, room.capacity))
            .collect();
        println!("  seeded: {}", rooms.join(", "));
    }
}
