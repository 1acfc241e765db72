use crate::support::emit_reply;
use timetable_engine::reply;

pub fn run(json_output: bool) {
    emit_reply(&reply::help(), json_output);
}
