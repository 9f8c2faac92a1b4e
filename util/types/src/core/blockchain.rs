use crate::core::error::EntityError;
use derive_more::Display;
use std::str::FromStr;

/// Specifies how the script `code_hash` is used to match the script code and how to run the code.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Display)]
pub enum ScriptHashType {
    /// Type "data" matches script code via cell data hash, and run the script code in v0 CKB VM.
    #[default]
    #[display("data")]
    Data = 0,
    /// Type "type" matches script code via cell type script hash.
    #[display("type")]
    Type = 1,
    /// Type "data1" matches script code via cell data hash, and run the script code in v1 CKB VM.
    #[display("data1")]
    Data1 = 2,
    /// Type "data2" matches script code via cell data hash, and run the script code in v2 CKB VM.
    #[display("data2")]
    Data2 = 4,
}

impl TryFrom<u8> for ScriptHashType {
    type Error = EntityError;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(ScriptHashType::Data),
            1 => Ok(ScriptHashType::Type),
            2 => Ok(ScriptHashType::Data1),
            4 => Ok(ScriptHashType::Data2),
            _ => Err(EntityError::InvalidHashType(v.to_string())),
        }
    }
}

impl FromStr for ScriptHashType {
    type Err = EntityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "data" => Ok(ScriptHashType::Data),
            "type" => Ok(ScriptHashType::Type),
            "data1" => Ok(ScriptHashType::Data1),
            "data2" => Ok(ScriptHashType::Data2),
            _ => Err(EntityError::InvalidHashType(s.to_owned())),
        }
    }
}

impl From<ScriptHashType> for u8 {
    #[inline]
    fn from(hash_type: ScriptHashType) -> u8 {
        hash_type as u8
    }
}

/// How a cell dep provides code.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Display)]
pub enum DepType {
    /// The cell itself holds the code.
    #[default]
    #[display("code")]
    Code = 0,
    /// The cell data is an out-point vector expanded into several deps.
    #[display("depGroup")]
    DepGroup = 1,
}

impl TryFrom<u8> for DepType {
    type Error = EntityError;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(DepType::Code),
            1 => Ok(DepType::DepGroup),
            _ => Err(EntityError::InvalidDepType(v.to_string())),
        }
    }
}

impl FromStr for DepType {
    type Err = EntityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "code" => Ok(DepType::Code),
            "depGroup" => Ok(DepType::DepGroup),
            _ => Err(EntityError::InvalidDepType(s.to_owned())),
        }
    }
}

impl From<DepType> for u8 {
    #[inline]
    fn from(dep_type: DepType) -> u8 {
        dep_type as u8
    }
}
