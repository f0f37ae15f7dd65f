//! Election account state as stored by the program

use crate::schema::{
    decode_prefix, encode, DecodeError, EncodeError, Field, FieldType, Record, Schema,
    SchemaRecord, Value,
};
use solana_sdk::pubkey::Pubkey;

/// Election account contents. The record sits at the start of the account
/// data; the remainder of the allocation is zero padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Election {
    pub name: String,
    pub candidates: Vec<String>,
    pub votes: Vec<u64>,
    pub voters: Vec<Pubkey>,
}

impl Election {
    /// Decode from raw account data, ignoring trailing padding
    pub fn unpack(data: &[u8]) -> Result<Self, DecodeError> {
        let (record, _) = decode_prefix(data, &Self::SCHEMA)?;
        Self::from_record(record)
    }

    pub fn pack(&self) -> Result<Vec<u8>, EncodeError> {
        encode(&self.to_record(), &Self::SCHEMA)
    }

    /// Vote count for a candidate by name
    pub fn tally(&self, candidate: &str) -> Option<u64> {
        let index = self.candidates.iter().position(|c| c == candidate)?;
        self.votes.get(index).copied()
    }

    pub fn is_registered(&self, voter: &Pubkey) -> bool {
        self.voters.contains(voter)
    }
}

impl SchemaRecord for Election {
    const SCHEMA: Schema = Schema {
        name: "Election",
        fields: &[
            Field::new("name", FieldType::String),
            Field::new("candidates", FieldType::Sequence(&FieldType::String)),
            Field::new("votes", FieldType::Sequence(&FieldType::U64)),
            Field::new("voters", FieldType::Sequence(&FieldType::PublicKey)),
        ],
    };

    fn to_record(&self) -> Record {
        Record::new()
            .with("name", self.name.as_str())
            .with("candidates", Value::strings(self.candidates.iter().cloned()))
            .with(
                "votes",
                Value::Sequence(self.votes.iter().copied().map(Value::U64).collect()),
            )
            .with(
                "voters",
                Value::Sequence(self.voters.iter().copied().map(Value::PublicKey).collect()),
            )
    }

    fn from_record(mut record: Record) -> Result<Self, DecodeError> {
        Ok(Self {
            name: record.take_string("name")?,
            candidates: record.take_strings("candidates")?,
            votes: record.take_u64s("votes")?,
            voters: record.take_pubkeys("voters")?,
        })
    }
}
