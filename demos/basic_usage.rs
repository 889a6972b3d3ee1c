use std::io;

use range_pager::BlockRange;
use range_pager::Cursor;
use range_pager::Direction;
use range_pager::PaginatableItem;
use range_pager::Pager;
use range_pager::PagerConfig;
use range_pager::Position;
use range_pager::RangeWalker;
use range_pager::SizingOptions;
use range_pager::StopHandle;

/// A log entry emitted in a block.
#[derive(Debug, Clone)]
struct Log {
    block: u64,
    log_index: u64,
}

impl PaginatableItem for Log {
    fn position(&self) -> Position {
        self.block
    }

    fn index_within_position(&self) -> u64 {
        self.log_index
    }
}

/// Stands in for a node answering `eth_getLogs` over a block range.
///
/// Blocks come in `direction` order, logs of a block by ascending index.
fn logs_in(range: BlockRange, direction: Direction) -> Vec<Log> {
    let mut blocks = (range.low..=range.high)
        .filter(|b| b % 7 == 0)
        .collect::<Vec<_>>();
    if direction == Direction::Backward {
        blocks.reverse();
    }

    blocks
        .into_iter()
        .flat_map(|block| (0..block % 4).map(move |log_index| Log { block, log_index }))
        .collect()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Collect logs from block 0 to 10_000, stop at the first block above 5_000 with logs.
    let walker = RangeWalker::with_options(&SizingOptions::default().with_initial_width(50))?;

    let query = |range: BlockRange, stop: StopHandle| async move {
        let logs = logs_in(range, Direction::Forward);
        if logs.iter().any(|l| l.block > 5_000) {
            stop.stop();
        }
        Ok::<_, io::Error>(logs)
    };

    let logs: Vec<Log> = walker
        .walk(0, 10_000, Direction::Forward, 2_000, &query)
        .await?;
    println!("Walked {} logs", logs.len());

    // Page through the most recent logs, newest first.
    let config = PagerConfig::new(
        Direction::Backward,
        10_000,
        0,
        25,
        &SizingOptions::default(),
    )?;
    let pager = Pager::new(config, |range: BlockRange| async move {
        Ok::<_, io::Error>(logs_in(range, Direction::Backward))
    });

    let page = pager.first_page::<Log>().await?;
    println!("First page: {} logs", page.items().len());

    // Persist the cursor, then resume from it.
    let saved = serde_json::to_string(page.cursor())?;
    println!("Saved cursor: {}", saved);

    let cursor: Cursor = serde_json::from_str(&saved)?;
    let page = pager.page::<Log>(Some(&cursor)).await?;
    if let Some(first) = page.items().first() {
        println!(
            "Second page starts at block {} log {}",
            first.block, first.log_index
        );
    }

    Ok(())
}
