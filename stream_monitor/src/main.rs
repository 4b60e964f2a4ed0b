use bot_commons::*;

fn main() {
    start_everything("WARN,stream_monitor=debug", stream_monitor::entry());
}
