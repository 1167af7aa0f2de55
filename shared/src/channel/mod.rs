pub mod block_data;
pub mod channel_adapter;
pub mod channel_data;
pub mod channel_structure;
pub mod reliable_block_channel;
pub mod unreliable_block_channel;
