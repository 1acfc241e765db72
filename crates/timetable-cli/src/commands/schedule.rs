use crate::support::{emit_reply, open_or_reply, today};
use serde_json::json;
use timetable_engine::{Reply, TimetableConfig, reply};

pub fn run(config: &TimetableConfig, json_output: bool) {
    let timetable = open_or_reply(config, json_output);
    let date = today();

    if !json_output {
        emit_reply(&reply::schedule(&timetable, date), false);
        return;
    }

    match timetable.list_day(date) {
        Ok(lessons) => {
            let payload = json!({
                "ok": true,
                "date": date.to_string(),
                "storePath": timetable.store_path().display().to_string(),
                "lessons": lessons,
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&payload).expect("json serialization")
            );
        }
        Err(err) => emit_reply(&Reply::rejected(&err), true),
    }
}
