use crate::support::{emit_reply, open_or_reply, today};
use timetable_engine::{TimetableConfig, reply};

pub fn run(config: &TimetableConfig, args: Vec<String>, json_output: bool) {
    let timetable = open_or_reply(config, json_output);
    let reply = reply::add_lesson(&timetable, &args.join(" "), today());
    emit_reply(&reply, json_output);
}
