use core::marker::PhantomData;

use chrono::DateTime;
use strata_core::{Resolution, StrataError};
use strata_warehouse::{WarehouseReader, WarehouseRequest};

use crate::UsageRecord;

/// Parses `epoch_seconds,units,blocks` lines into finest-resolution [`UsageRecord`]s.
#[derive(Debug, Clone, Copy)]
pub struct UsageReader<Res>(PhantomData<fn() -> Res>);

impl<Res> Default for UsageReader<Res> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<Res> UsageReader<Res> {
    /// New reader.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn field<'a>(
    fields: &mut impl Iterator<Item = &'a str>,
    name: &str,
    index: usize,
) -> Result<&'a str, StrataError> {
    fields
        .next()
        .map(str::trim)
        .ok_or_else(|| StrataError::Data(format!("line {index}: missing {name}")))
}

fn number<T: core::str::FromStr>(raw: &str, name: &str, index: usize) -> Result<T, StrataError> {
    raw.parse()
        .map_err(|_| StrataError::Data(format!("line {index}: invalid {name} {raw:?}")))
}

impl<Res: Resolution> WarehouseReader<Res> for UsageReader<Res> {
    type Record = UsageRecord<Res>;

    fn read_line(
        &self,
        _request: &WarehouseRequest<Res>,
        line: &str,
        index: usize,
    ) -> Result<UsageRecord<Res>, StrataError> {
        let mut fields = line.split(',');
        let epoch: i64 = number(field(&mut fields, "timestamp", index)?, "timestamp", index)?;
        let units = number(field(&mut fields, "units", index)?, "units", index)?;
        let blocks = number(field(&mut fields, "blocks", index)?, "blocks", index)?;

        let start = DateTime::from_timestamp(epoch, 0)
            .ok_or_else(|| StrataError::Data(format!("line {index}: timestamp out of range")))?;
        // warehouse data is always at the finest resolution
        let resolution = Res::finest();
        Ok(UsageRecord {
            resolution,
            start,
            end: resolution.next(start),
            units,
            blocks,
        })
    }
}
