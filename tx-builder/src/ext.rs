use crate::{fee, lookup, select, CompleteFeeOptions, Completion};
use async_trait::async_trait;
use ckb_error::Error;
use ckb_traits::{CellCollector, CellFilter, CellProvider, Signer};
use ckb_types::core::{
    Byte32, Capacity, Cell, FeeRate, Script, ScriptHashType, SignHashInfo, Transaction,
};
use std::ops::ControlFlow;

/// Transaction completion as methods.
///
/// Every method forwards to the function of the same name in this crate.
#[async_trait]
pub trait TransactionExt {
    /// See [`inputs_capacity`](crate::inputs_capacity).
    async fn inputs_capacity<P>(&mut self, provider: &P) -> Result<Capacity, Error>
    where
        P: CellProvider + ?Sized;

    /// See [`inputs_udt_balance`](crate::inputs_udt_balance).
    async fn inputs_udt_balance<P>(
        &mut self,
        provider: &P,
        type_script: &Script,
    ) -> Result<u128, Error>
    where
        P: CellProvider + ?Sized;

    /// See [`fee`](fn@crate::fee).
    async fn fee<P>(&mut self, provider: &P) -> Result<Capacity, Error>
    where
        P: CellProvider + ?Sized;

    /// See [`fee_rate`](crate::fee_rate).
    async fn fee_rate<P>(&mut self, provider: &P) -> Result<FeeRate, Error>
    where
        P: CellProvider + ?Sized;

    /// See [`find_input_index_by_lock`](crate::find_input_index_by_lock).
    async fn find_input_index_by_lock<P>(
        &mut self,
        lock: &Script,
        provider: &P,
    ) -> Result<Option<usize>, Error>
    where
        P: CellProvider + ?Sized;

    /// See [`find_last_input_index_by_lock`](crate::find_last_input_index_by_lock).
    async fn find_last_input_index_by_lock<P>(
        &mut self,
        lock: &Script,
        provider: &P,
    ) -> Result<Option<usize>, Error>
    where
        P: CellProvider + ?Sized;

    /// See [`find_input_index_by_lock_id`](crate::find_input_index_by_lock_id).
    async fn find_input_index_by_lock_id<P>(
        &mut self,
        code_hash: &Byte32,
        hash_type: ScriptHashType,
        provider: &P,
    ) -> Result<Option<usize>, Error>
    where
        P: CellProvider + ?Sized;

    /// See [`sign_hash_info`](crate::sign_hash_info).
    async fn get_sign_hash_info<P>(
        &mut self,
        lock: &Script,
        provider: &P,
    ) -> Result<Option<SignHashInfo>, Error>
    where
        P: CellProvider + ?Sized;

    /// See [`prepare_sighash_all_witness`](crate::prepare_sighash_all_witness).
    async fn prepare_sighash_all_witness<P>(
        &mut self,
        lock: &Script,
        lock_len: usize,
        provider: &P,
    ) -> Result<bool, Error>
    where
        P: CellProvider + ?Sized;

    /// See [`complete_inputs`](crate::complete_inputs).
    async fn complete_inputs<C, T, F>(
        &mut self,
        from: &C,
        filter: CellFilter,
        init: T,
        fold: F,
    ) -> Result<Completion<T>, Error>
    where
        C: CellCollector + ?Sized,
        T: Send,
        F: FnMut(T, &Cell, usize, &[Cell]) -> ControlFlow<(), T> + Send;

    /// See [`complete_inputs_by_capacity`](crate::complete_inputs_by_capacity).
    async fn complete_inputs_by_capacity<S>(
        &mut self,
        from: &S,
        capacity_tweak: Capacity,
        filter: Option<CellFilter>,
    ) -> Result<usize, Error>
    where
        S: CellProvider + CellCollector + ?Sized;

    /// See [`complete_inputs_by_udt`](crate::complete_inputs_by_udt).
    async fn complete_inputs_by_udt<S>(
        &mut self,
        from: &S,
        type_script: &Script,
        balance_tweak: u128,
    ) -> Result<usize, Error>
    where
        S: CellProvider + CellCollector + ?Sized;

    /// See [`complete_inputs_all`](crate::complete_inputs_all).
    async fn complete_inputs_all<C>(
        &mut self,
        from: &C,
        filter: Option<CellFilter>,
    ) -> Result<usize, Error>
    where
        C: CellCollector + ?Sized;

    /// See [`complete_inputs_add_one`](crate::complete_inputs_add_one).
    async fn complete_inputs_add_one<C>(
        &mut self,
        from: &C,
        filter: Option<CellFilter>,
    ) -> Result<usize, Error>
    where
        C: CellCollector + ?Sized;

    /// See [`complete_inputs_at_least_one`](crate::complete_inputs_at_least_one).
    async fn complete_inputs_at_least_one<C>(
        &mut self,
        from: &C,
        filter: Option<CellFilter>,
    ) -> Result<usize, Error>
    where
        C: CellCollector + ?Sized;

    /// See [`complete_fee`](crate::complete_fee).
    async fn complete_fee<S, F>(
        &mut self,
        from: &S,
        change: F,
        fee_rate: Option<FeeRate>,
        filter: Option<CellFilter>,
        options: &CompleteFeeOptions,
    ) -> Result<(usize, bool), Error>
    where
        S: Signer + ?Sized,
        F: FnMut(&mut Transaction, i128) -> Result<Capacity, Error> + Send;

    /// See [`complete_fee_change_to_lock`](crate::complete_fee_change_to_lock).
    async fn complete_fee_change_to_lock<S>(
        &mut self,
        from: &S,
        change_lock: &Script,
        fee_rate: Option<FeeRate>,
        filter: Option<CellFilter>,
        options: &CompleteFeeOptions,
    ) -> Result<(usize, bool), Error>
    where
        S: Signer + ?Sized;

    /// See [`complete_fee_change_to_output`](crate::complete_fee_change_to_output).
    async fn complete_fee_change_to_output<S>(
        &mut self,
        from: &S,
        index: usize,
        fee_rate: Option<FeeRate>,
        filter: Option<CellFilter>,
        options: &CompleteFeeOptions,
    ) -> Result<(usize, bool), Error>
    where
        S: Signer + ?Sized;
}

#[async_trait]
impl TransactionExt for Transaction {
    async fn inputs_capacity<P>(&mut self, provider: &P) -> Result<Capacity, Error>
    where
        P: CellProvider + ?Sized,
    {
        lookup::inputs_capacity(self, provider).await
    }

    async fn inputs_udt_balance<P>(
        &mut self,
        provider: &P,
        type_script: &Script,
    ) -> Result<u128, Error>
    where
        P: CellProvider + ?Sized,
    {
        lookup::inputs_udt_balance(self, provider, type_script).await
    }

    async fn fee<P>(&mut self, provider: &P) -> Result<Capacity, Error>
    where
        P: CellProvider + ?Sized,
    {
        lookup::fee(self, provider).await
    }

    async fn fee_rate<P>(&mut self, provider: &P) -> Result<FeeRate, Error>
    where
        P: CellProvider + ?Sized,
    {
        lookup::fee_rate(self, provider).await
    }

    async fn find_input_index_by_lock<P>(
        &mut self,
        lock: &Script,
        provider: &P,
    ) -> Result<Option<usize>, Error>
    where
        P: CellProvider + ?Sized,
    {
        lookup::find_input_index_by_lock(self, lock, provider).await
    }

    async fn find_last_input_index_by_lock<P>(
        &mut self,
        lock: &Script,
        provider: &P,
    ) -> Result<Option<usize>, Error>
    where
        P: CellProvider + ?Sized,
    {
        lookup::find_last_input_index_by_lock(self, lock, provider).await
    }

    async fn find_input_index_by_lock_id<P>(
        &mut self,
        code_hash: &Byte32,
        hash_type: ScriptHashType,
        provider: &P,
    ) -> Result<Option<usize>, Error>
    where
        P: CellProvider + ?Sized,
    {
        lookup::find_input_index_by_lock_id(self, code_hash, hash_type, provider).await
    }

    async fn get_sign_hash_info<P>(
        &mut self,
        lock: &Script,
        provider: &P,
    ) -> Result<Option<SignHashInfo>, Error>
    where
        P: CellProvider + ?Sized,
    {
        lookup::sign_hash_info(self, lock, provider).await
    }

    async fn prepare_sighash_all_witness<P>(
        &mut self,
        lock: &Script,
        lock_len: usize,
        provider: &P,
    ) -> Result<bool, Error>
    where
        P: CellProvider + ?Sized,
    {
        lookup::prepare_sighash_all_witness(self, lock, lock_len, provider).await
    }

    async fn complete_inputs<C, T, F>(
        &mut self,
        from: &C,
        filter: CellFilter,
        init: T,
        fold: F,
    ) -> Result<Completion<T>, Error>
    where
        C: CellCollector + ?Sized,
        T: Send,
        F: FnMut(T, &Cell, usize, &[Cell]) -> ControlFlow<(), T> + Send,
    {
        select::complete_inputs(self, from, filter, init, fold).await
    }

    async fn complete_inputs_by_capacity<S>(
        &mut self,
        from: &S,
        capacity_tweak: Capacity,
        filter: Option<CellFilter>,
    ) -> Result<usize, Error>
    where
        S: CellProvider + CellCollector + ?Sized,
    {
        select::complete_inputs_by_capacity(self, from, capacity_tweak, filter).await
    }

    async fn complete_inputs_by_udt<S>(
        &mut self,
        from: &S,
        type_script: &Script,
        balance_tweak: u128,
    ) -> Result<usize, Error>
    where
        S: CellProvider + CellCollector + ?Sized,
    {
        select::complete_inputs_by_udt(self, from, type_script, balance_tweak).await
    }

    async fn complete_inputs_all<C>(
        &mut self,
        from: &C,
        filter: Option<CellFilter>,
    ) -> Result<usize, Error>
    where
        C: CellCollector + ?Sized,
    {
        select::complete_inputs_all(self, from, filter).await
    }

    async fn complete_inputs_add_one<C>(
        &mut self,
        from: &C,
        filter: Option<CellFilter>,
    ) -> Result<usize, Error>
    where
        C: CellCollector + ?Sized,
    {
        select::complete_inputs_add_one(self, from, filter).await
    }

    async fn complete_inputs_at_least_one<C>(
        &mut self,
        from: &C,
        filter: Option<CellFilter>,
    ) -> Result<usize, Error>
    where
        C: CellCollector + ?Sized,
    {
        select::complete_inputs_at_least_one(self, from, filter).await
    }

    async fn complete_fee<S, F>(
        &mut self,
        from: &S,
        change: F,
        fee_rate: Option<FeeRate>,
        filter: Option<CellFilter>,
        options: &CompleteFeeOptions,
    ) -> Result<(usize, bool), Error>
    where
        S: Signer + ?Sized,
        F: FnMut(&mut Transaction, i128) -> Result<Capacity, Error> + Send,
    {
        fee::complete_fee(self, from, change, fee_rate, filter, options).await
    }

    async fn complete_fee_change_to_lock<S>(
        &mut self,
        from: &S,
        change_lock: &Script,
        fee_rate: Option<FeeRate>,
        filter: Option<CellFilter>,
        options: &CompleteFeeOptions,
    ) -> Result<(usize, bool), Error>
    where
        S: Signer + ?Sized,
    {
        fee::complete_fee_change_to_lock(self, from, change_lock, fee_rate, filter, options).await
    }

    async fn complete_fee_change_to_output<S>(
        &mut self,
        from: &S,
        index: usize,
        fee_rate: Option<FeeRate>,
        filter: Option<CellFilter>,
        options: &CompleteFeeOptions,
    ) -> Result<(usize, bool), Error>
    where
        S: Signer + ?Sized,
    {
        fee::complete_fee_change_to_output(self, from, index, fee_rate, filter, options).await
    }
}
