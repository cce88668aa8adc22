//! CSV export of a session's loot and per-loadout breakdown.

use std::io::Write;

use serde::Serialize;

use crate::error::LedgerError;
use crate::stats::SessionStats;

#[derive(Debug, Serialize)]
struct LootRow<'a> {
    item: &'a str,
    count: u64,
    quantity: u64,
    total_value: f64,
}

#[derive(Debug, Serialize)]
struct LoadoutRow<'a> {
    loadout_id: &'a str,
    loadout_name: &'a str,
    shots: u64,
    loot_value: f64,
    spend: f64,
    return_rate: f64,
}

/// One row per looted item, in item-name order.
pub fn write_loot_csv<W: Write>(stats: &SessionStats, out: W) -> Result<(), LedgerError> {
    let mut writer = csv::Writer::from_writer(out);
    for (item, loot) in &stats.loot.by_item {
        writer.serialize(LootRow {
            item,
            count: loot.count,
            quantity: loot.quantity,
            total_value: loot.total_value,
        })?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// One row per loadout, in order of first use.
pub fn write_loadout_csv<W: Write>(stats: &SessionStats, out: W) -> Result<(), LedgerError> {
    let mut writer = csv::Writer::from_writer(out);
    for entry in &stats.loadout_breakdown {
        writer.serialize(LoadoutRow {
            loadout_id: &entry.loadout_id,
            loadout_name: &entry.loadout_name,
            shots: entry.shots,
            loot_value: entry.loot_value,
            spend: entry.spend,
            return_rate: entry.return_rate(),
        })?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{ItemLoot, LoadoutBreakdown};

    #[test]
    fn loot_csv_has_header_and_sorted_rows() {
        let mut stats = SessionStats::default();
        stats.loot.by_item.insert(
            "Shrapnel".into(),
            ItemLoot {
                count: 2,
                quantity: 300,
                total_value: 0.03,
            },
        );
        stats.loot.by_item.insert(
            "Animal Hide".into(),
            ItemLoot {
                count: 1,
                quantity: 4,
                total_value: 0.4,
            },
        );

        let mut buf = Vec::new();
        write_loot_csv(&stats, &mut buf).expect("write");
        let text = String::from_utf8(buf).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "item,count,quantity,total_value");
        assert_eq!(lines[1], "Animal Hide,1,4,0.4");
        assert_eq!(lines[2], "Shrapnel,2,300,0.03");
    }

    #[test]
    fn loadout_csv_includes_return_rate() {
        let mut stats = SessionStats::default();
        stats.loadout_breakdown.push(LoadoutBreakdown {
            loadout_id: "a".into(),
            loadout_name: "Rifle, cheap".into(),
            shots: 4,
            loot_value: 1.0,
            spend: 2.0,
        });

        let mut buf = Vec::new();
        write_loadout_csv(&stats, &mut buf).expect("write");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.starts_with("loadout_id,loadout_name,shots,loot_value,spend,return_rate\n"));
        assert!(text.contains("a,\"Rifle, cheap\",4,1.0,2.0,50.0"));
    }
}
