//! Wall-clock timestamps shared by the coupon store and the action journal
use chrono::{DateTime, TimeDelta, Utc};
use std::ops::{Add, Sub};

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub struct TimeStamp(DateTime<Utc>);

impl TimeStamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }
    /// Returns `None` when `millis` falls outside the range chrono can represent.
    pub fn from_millis(millis: i64) -> Option<Self> {
        DateTime::from_timestamp_millis(millis).map(Self)
    }
    pub fn as_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }
    pub fn to_datetime_utc(&self) -> DateTime<Utc> {
        self.0
    }
}

impl From<DateTime<Utc>> for TimeStamp {
    fn from(value: DateTime<Utc>) -> Self {
        TimeStamp(value)
    }
}

impl Add<TimeDelta> for TimeStamp {
    type Output = TimeStamp;

    fn add(self, rhs: TimeDelta) -> Self::Output {
        TimeStamp(self.0 + rhs)
    }
}

impl Sub<TimeDelta> for TimeStamp {
    type Output = TimeStamp;

    fn sub(self, rhs: TimeDelta) -> Self::Output {
        TimeStamp(self.0 - rhs)
    }
}

impl<C> minicbor::Encode<C> for TimeStamp {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.i64(self.as_millis())?.ok()
    }
}

impl<'b, C> minicbor::Decode<'b, C> for TimeStamp {
    fn decode(d: &mut minicbor::Decoder<'b>, _: &mut C) -> Result<Self, minicbor::decode::Error> {
        let millis = d.i64()?;

        TimeStamp::from_millis(millis).ok_or(minicbor::decode::Error::message(
            "timestamp millis out of range for utc",
        ))
    }
}
