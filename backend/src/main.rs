use moon::*;

async fn frontend() -> Frontend {
    Frontend::new()
        .title("Wild Pig Populations")
        .index_by_robots(false)
}

// The chart is fully client-side; no messages travel up.
async fn up_msg_handler(_: UpMsgRequest<()>) {}

#[moon::main]
async fn main() -> std::io::Result<()> {
    start(frontend, up_msg_handler, |_error| {}).await
}
