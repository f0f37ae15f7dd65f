//! Election program instruction set
//!
//! Instruction data is a one byte opcode followed by the schema-encoded
//! body. Encoding the body and tagging it with the opcode are separate
//! steps so the schema encoder stays independent of this program.

use crate::schema::{
    decode_record, encode_record, DecodeError, EncodeError, Field, FieldType, Record, Schema,
    SchemaRecord, Value,
};
use borsh::{BorshDeserialize, BorshSerialize};
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};

/// Opcode byte selecting the program operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ElectionOpcode {
    CreateElection = 0,
    RegisterVoter = 1,
    CastVote = 2,
}

impl TryFrom<u8> for ElectionOpcode {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ElectionOpcode::CreateElection),
            1 => Ok(ElectionOpcode::RegisterVoter),
            2 => Ok(ElectionOpcode::CastVote),
            other => Err(DecodeError::UnknownOpcode(other)),
        }
    }
}

/// Body of a create-election instruction.
///
/// Candidate order is ballot order. Neither the name nor the candidate list
/// is validated here.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct ElectionCreationRecord {
    pub name: String,
    pub candidates: Vec<String>,
}

impl ElectionCreationRecord {
    pub fn new<I, S>(name: impl Into<String>, candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            candidates: candidates.into_iter().map(Into::into).collect(),
        }
    }
}

impl SchemaRecord for ElectionCreationRecord {
    const SCHEMA: Schema = Schema {
        name: "CreateElection",
        fields: &[
            Field::new("name", FieldType::String),
            Field::new("candidates", FieldType::Sequence(&FieldType::String)),
        ],
    };

    fn to_record(&self) -> Record {
        Record::new()
            .with("name", self.name.as_str())
            .with("candidates", Value::strings(self.candidates.iter().cloned()))
    }

    fn from_record(mut record: Record) -> Result<Self, DecodeError> {
        Ok(Self {
            name: record.take_string("name")?,
            candidates: record.take_strings("candidates")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterVoterRecord {
    pub voter_pubkey: Pubkey,
}

impl SchemaRecord for RegisterVoterRecord {
    const SCHEMA: Schema = Schema {
        name: "RegisterVoter",
        fields: &[Field::new("voter_pubkey", FieldType::PublicKey)],
    };

    fn to_record(&self) -> Record {
        Record::new().with("voter_pubkey", self.voter_pubkey)
    }

    fn from_record(mut record: Record) -> Result<Self, DecodeError> {
        Ok(Self {
            voter_pubkey: record.take_pubkey("voter_pubkey")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastVoteRecord {
    pub voter_pubkey: Pubkey,
    pub candidate_index: u8,
}

impl SchemaRecord for CastVoteRecord {
    const SCHEMA: Schema = Schema {
        name: "CastVote",
        fields: &[
            Field::new("voter_pubkey", FieldType::PublicKey),
            Field::new("candidate_index", FieldType::U8),
        ],
    };

    fn to_record(&self) -> Record {
        Record::new()
            .with("voter_pubkey", self.voter_pubkey)
            .with("candidate_index", self.candidate_index)
    }

    fn from_record(mut record: Record) -> Result<Self, DecodeError> {
        Ok(Self {
            voter_pubkey: record.take_pubkey("voter_pubkey")?,
            candidate_index: record.take_u8("candidate_index")?,
        })
    }
}

/// Instructions understood by the election program
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElectionInstruction {
    CreateElection(ElectionCreationRecord),
    RegisterVoter(RegisterVoterRecord),
    CastVote(CastVoteRecord),
}

impl ElectionInstruction {
    pub fn opcode(&self) -> ElectionOpcode {
        match self {
            ElectionInstruction::CreateElection(_) => ElectionOpcode::CreateElection,
            ElectionInstruction::RegisterVoter(_) => ElectionOpcode::RegisterVoter,
            ElectionInstruction::CastVote(_) => ElectionOpcode::CastVote,
        }
    }

    /// Encode as instruction data: opcode byte followed by the body
    pub fn pack(&self) -> Result<Vec<u8>, EncodeError> {
        let body = match self {
            ElectionInstruction::CreateElection(record) => encode_record(record)?,
            ElectionInstruction::RegisterVoter(record) => encode_record(record)?,
            ElectionInstruction::CastVote(record) => encode_record(record)?,
        };
        Ok(tag_payload(self.opcode(), body))
    }

    pub fn unpack(data: &[u8]) -> Result<Self, DecodeError> {
        let (tag, rest) = data.split_first().ok_or(DecodeError::EmptyInput)?;
        match ElectionOpcode::try_from(*tag)? {
            ElectionOpcode::CreateElection => Ok(Self::CreateElection(decode_record(rest)?)),
            ElectionOpcode::RegisterVoter => Ok(Self::RegisterVoter(decode_record(rest)?)),
            ElectionOpcode::CastVote => Ok(Self::CastVote(decode_record(rest)?)),
        }
    }
}

/// Prefix an encoded body with its opcode byte
pub fn tag_payload(opcode: ElectionOpcode, body: Vec<u8>) -> Vec<u8> {
    let mut data = Vec::with_capacity(body.len() + 1);
    data.push(opcode as u8);
    data.extend_from_slice(&body);
    data
}

/// Account list for create-election: the new election account (signer,
/// writable) followed by the payer (signer, read-only)
pub fn create_election_accounts(election_account: Pubkey, payer: Pubkey) -> Vec<AccountMeta> {
    vec![
        AccountMeta::new(election_account, true),
        AccountMeta::new_readonly(payer, true),
    ]
}

/// Build a create-election instruction
pub fn create_election(
    program_id: Pubkey,
    election_account: Pubkey,
    payer: Pubkey,
    record: ElectionCreationRecord,
) -> Result<Instruction, EncodeError> {
    let data = ElectionInstruction::CreateElection(record).pack()?;
    Ok(Instruction {
        program_id,
        accounts: create_election_accounts(election_account, payer),
        data,
    })
}

/// Build a register-voter instruction. The voter signs for their own
/// registration.
pub fn register_voter(
    program_id: Pubkey,
    election_account: Pubkey,
    voter: Pubkey,
) -> Result<Instruction, EncodeError> {
    let data = ElectionInstruction::RegisterVoter(RegisterVoterRecord {
        voter_pubkey: voter,
    })
    .pack()?;
    Ok(Instruction {
        program_id,
        accounts: vec![
            AccountMeta::new(election_account, false),
            AccountMeta::new_readonly(voter, true),
        ],
        data,
    })
}

/// Build a cast-vote instruction
pub fn cast_vote(
    program_id: Pubkey,
    election_account: Pubkey,
    voter: Pubkey,
    candidate_index: u8,
) -> Result<Instruction, EncodeError> {
    let data = ElectionInstruction::CastVote(CastVoteRecord {
        voter_pubkey: voter,
        candidate_index,
    })
    .pack()?;
    Ok(Instruction {
        program_id,
        accounts: vec![
            AccountMeta::new(election_account, false),
            AccountMeta::new_readonly(voter, true),
        ],
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_try_from() {
        assert_eq!(ElectionOpcode::try_from(2).unwrap(), ElectionOpcode::CastVote);
        assert!(matches!(
            ElectionOpcode::try_from(7),
            Err(DecodeError::UnknownOpcode(7))
        ));
    }

    #[test]
    fn test_tag_payload_prefixes_opcode() {
        let data = tag_payload(ElectionOpcode::RegisterVoter, vec![9, 9]);
        assert_eq!(data, vec![1, 9, 9]);
    }

    #[test]
    fn test_unpack_rejects_empty_and_unknown() {
        assert!(matches!(
            ElectionInstruction::unpack(&[]),
            Err(DecodeError::EmptyInput)
        ));
        assert!(matches!(
            ElectionInstruction::unpack(&[3, 0, 0]),
            Err(DecodeError::UnknownOpcode(3))
        ));
    }

    #[test]
    fn test_cast_vote_layout() {
        let voter = Pubkey::new_unique();
        let data = ElectionInstruction::CastVote(CastVoteRecord {
            voter_pubkey: voter,
            candidate_index: 4,
        })
        .pack()
        .unwrap();

        assert_eq!(data.len(), 1 + 32 + 1);
        assert_eq!(data[0], 2);
        assert_eq!(&data[1..33], &voter.to_bytes()[..]);
        assert_eq!(data[33], 4);
    }

    #[test]
    fn test_register_voter_round_trip() {
        let instruction = ElectionInstruction::RegisterVoter(RegisterVoterRecord {
            voter_pubkey: Pubkey::new_unique(),
        });

        let data = instruction.pack().unwrap();
        assert_eq!(ElectionInstruction::unpack(&data).unwrap(), instruction);
    }

    #[test]
    fn test_vote_instructions_require_voter_signature() {
        let program_id = Pubkey::new_unique();
        let election = Pubkey::new_unique();
        let voter = Pubkey::new_unique();

        for ix in [
            register_voter(program_id, election, voter).unwrap(),
            cast_vote(program_id, election, voter, 0).unwrap(),
        ] {
            assert_eq!(ix.program_id, program_id);
            assert_eq!(ix.accounts[0], AccountMeta::new(election, false));
            assert_eq!(ix.accounts[1], AccountMeta::new_readonly(voter, true));
        }
    }
}
