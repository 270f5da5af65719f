mod command;
mod config;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    command::run()
}
