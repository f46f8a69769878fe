//! Engine function table

use crate::types::{
    C2paBuilder, C2paReader, C2paSigner, C2paSignerInfo, C2paStream, FlushCallback, ReadCallback,
    SeekCallback, SignerCallback, StreamContext, WriteCallback,
};
use c2pa_bridge_core::SigningAlg;
use std::ffi::{c_char, c_int, c_void};

pub type VersionFn = unsafe extern "C" fn() -> *mut c_char;
pub type ErrorFn = unsafe extern "C" fn() -> *mut c_char;
pub type LoadSettingsFn =
    unsafe extern "C" fn(settings: *const c_char, format: *const c_char) -> c_int;
pub type StringFreeFn = unsafe extern "C" fn(s: *mut c_char);

pub type CreateStreamFn = unsafe extern "C" fn(
    context: *mut StreamContext,
    reader: ReadCallback,
    seeker: SeekCallback,
    writer: WriteCallback,
    flusher: FlushCallback,
) -> *mut C2paStream;
pub type ReleaseStreamFn = unsafe extern "C" fn(stream: *mut C2paStream);

pub type ReaderFromStreamFn =
    unsafe extern "C" fn(format: *const c_char, stream: *mut C2paStream) -> *mut C2paReader;
pub type ReaderJsonFn = unsafe extern "C" fn(reader: *mut C2paReader) -> *mut c_char;
pub type ReaderResourceToStreamFn = unsafe extern "C" fn(
    reader: *mut C2paReader,
    uri: *const c_char,
    stream: *mut C2paStream,
) -> i64;
pub type ReaderFreeFn = unsafe extern "C" fn(reader: *mut C2paReader);

pub type BuilderFromJsonFn = unsafe extern "C" fn(json: *const c_char) -> *mut C2paBuilder;
pub type BuilderFromArchiveFn = unsafe extern "C" fn(stream: *mut C2paStream) -> *mut C2paBuilder;
pub type BuilderSetNoEmbedFn = unsafe extern "C" fn(builder: *mut C2paBuilder);
pub type BuilderSetRemoteUrlFn =
    unsafe extern "C" fn(builder: *mut C2paBuilder, url: *const c_char) -> c_int;
pub type BuilderAddResourceFn = unsafe extern "C" fn(
    builder: *mut C2paBuilder,
    uri: *const c_char,
    stream: *mut C2paStream,
) -> c_int;
pub type BuilderAddIngredientFn = unsafe extern "C" fn(
    builder: *mut C2paBuilder,
    ingredient_json: *const c_char,
    format: *const c_char,
    source: *mut C2paStream,
) -> c_int;
pub type BuilderToArchiveFn =
    unsafe extern "C" fn(builder: *mut C2paBuilder, stream: *mut C2paStream) -> c_int;
pub type BuilderSignFn = unsafe extern "C" fn(
    builder: *mut C2paBuilder,
    format: *const c_char,
    source: *mut C2paStream,
    dest: *mut C2paStream,
    signer: *mut C2paSigner,
    manifest_bytes: *mut *const u8,
) -> i64;
pub type BuilderDataHashedPlaceholderFn = unsafe extern "C" fn(
    builder: *mut C2paBuilder,
    reserved_size: usize,
    format: *const c_char,
    manifest_bytes: *mut *const u8,
) -> i64;
pub type BuilderSignDataHashedEmbeddableFn = unsafe extern "C" fn(
    builder: *mut C2paBuilder,
    signer: *mut C2paSigner,
    data_hash: *const c_char,
    format: *const c_char,
    asset: *mut C2paStream,
    manifest_bytes: *mut *const u8,
) -> i64;
pub type FormatEmbeddableFn = unsafe extern "C" fn(
    format: *const c_char,
    manifest_bytes: *const u8,
    manifest_len: usize,
    result: *mut *const u8,
) -> i64;
pub type ManifestBytesFreeFn = unsafe extern "C" fn(bytes: *const u8);
pub type BuilderFreeFn = unsafe extern "C" fn(builder: *mut C2paBuilder);

pub type SignerCreateFn = unsafe extern "C" fn(
    context: *const c_void,
    callback: SignerCallback,
    alg: SigningAlg,
    certs: *const c_char,
    tsa_url: *const c_char,
) -> *mut C2paSigner;
pub type SignerFromInfoFn = unsafe extern "C" fn(info: *const C2paSignerInfo) -> *mut C2paSigner;
pub type SignerReserveSizeFn = unsafe extern "C" fn(signer: *mut C2paSigner) -> i64;
pub type SignerFreeFn = unsafe extern "C" fn(signer: *mut C2paSigner);

pub type ReadFileFn =
    unsafe extern "C" fn(path: *const c_char, data_dir: *const c_char) -> *mut c_char;
pub type ReadIngredientFileFn =
    unsafe extern "C" fn(path: *const c_char, data_dir: *const c_char) -> *mut c_char;
pub type SignFileFn = unsafe extern "C" fn(
    source_path: *const c_char,
    dest_path: *const c_char,
    manifest: *const c_char,
    signer_info: *const C2paSignerInfo,
    data_dir: *const c_char,
) -> *mut c_char;

/// Every entry point the bridge uses, resolved once at load time
///
/// The pointers stay valid for as long as the library they came from is
/// loaded; [`crate::Engine`] keeps the two together.
#[derive(Clone, Copy)]
pub struct EngineApi {
    pub version: VersionFn,
    pub error: ErrorFn,
    pub load_settings: LoadSettingsFn,
    pub string_free: StringFreeFn,

    pub create_stream: CreateStreamFn,
    pub release_stream: ReleaseStreamFn,

    pub reader_from_stream: ReaderFromStreamFn,
    pub reader_json: ReaderJsonFn,
    pub reader_resource_to_stream: ReaderResourceToStreamFn,
    pub reader_free: ReaderFreeFn,

    pub builder_from_json: BuilderFromJsonFn,
    pub builder_from_archive: BuilderFromArchiveFn,
    pub builder_set_no_embed: BuilderSetNoEmbedFn,
    pub builder_set_remote_url: BuilderSetRemoteUrlFn,
    pub builder_add_resource: BuilderAddResourceFn,
    pub builder_add_ingredient: BuilderAddIngredientFn,
    pub builder_to_archive: BuilderToArchiveFn,
    pub builder_sign: BuilderSignFn,
    pub builder_data_hashed_placeholder: BuilderDataHashedPlaceholderFn,
    pub builder_sign_data_hashed_embeddable: BuilderSignDataHashedEmbeddableFn,
    pub format_embeddable: FormatEmbeddableFn,
    pub manifest_bytes_free: ManifestBytesFreeFn,
    pub builder_free: BuilderFreeFn,

    pub signer_create: SignerCreateFn,
    pub signer_from_info: SignerFromInfoFn,
    pub signer_reserve_size: SignerReserveSizeFn,
    pub signer_free: SignerFreeFn,

    pub read_file: ReadFileFn,
    pub read_ingredient_file: ReadIngredientFileFn,
    pub sign_file: SignFileFn,
}

impl std::fmt::Debug for EngineApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineApi")
            .field("version", &(self.version as *const ()))
            .finish_non_exhaustive()
    }
}
