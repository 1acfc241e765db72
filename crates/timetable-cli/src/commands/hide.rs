use crate::support::{emit_reply, open_or_reply, today};
use timetable_engine::{TimetableConfig, reply};

pub fn run(config: &TimetableConfig, number: String, json_output: bool) {
    let timetable = open_or_reply(config, json_output);
    let reply = reply::hide_lesson(&timetable, &number, today());
    emit_reply(&reply, json_output);
}
