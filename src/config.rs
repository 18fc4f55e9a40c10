/// Runtime-configurable model parameters.
///
/// Defaults target Hopper-class nodes on an NDR InfiniBand fabric. Override
/// individual constants via environment variables (prefixed `COMMTUNE_`) or
/// point `COMMTUNE_PARAMS_FILE` at a JSON file; env variables win over the
/// file.
///
/// Recognized variables:
/// - `COMMTUNE_PARAMS_FILE` (path to a JSON override file)
/// - `COMMTUNE_NET_LAT_US` (inter-node hop latency, µs)
/// - `COMMTUNE_INTERNODE_BW_GBS` (inter-node bandwidth per channel, GiB/s)
/// - `COMMTUNE_INTRANODE_BW_GBS` (NVLink bandwidth per link, GiB/s)
/// - `COMMTUNE_NUM_CHANNELS` (parallel channel budget)
///
/// Unparsable variable values fall back to the previous value; a requested
/// params file that cannot be read or parsed fails initialization.
use serde::Deserialize;

use crate::error::{Result, TunerError};
use crate::interconnect::{gib_per_s_to_bytes_per_us, ModelParams};

/// Shape of the JSON override file. Every field is optional; missing fields
/// keep their defaults. Bandwidths are given in GiB/s, as on hardware data
/// sheets, and converted to the model's bytes/µs internally.
#[derive(Debug, Default, Deserialize)]
pub struct ParamsFile {
    pub net_lat_us: Option<f64>,
    pub internode_bw_gbs: Option<f64>,
    pub intranode_bw_gbs: Option<f64>,
    pub num_channels: Option<u32>,
}

impl ParamsFile {
    /// Overlay this file's fields onto `params`.
    pub fn apply(&self, params: &mut ModelParams) {
        if let Some(v) = self.net_lat_us {
            params.net_lat_us = v;
        }
        if let Some(v) = self.internode_bw_gbs {
            params.internode_bw = gib_per_s_to_bytes_per_us(v);
        }
        if let Some(v) = self.intranode_bw_gbs {
            params.intranode_bw = gib_per_s_to_bytes_per_us(v);
        }
        if let Some(v) = self.num_channels {
            params.num_channels = v;
        }
    }
}

/// Parse a JSON override file's contents and overlay them onto `params`.
pub fn apply_file_overrides(params: &mut ModelParams, path: &str, json: &str) -> Result<()> {
    let file: ParamsFile = serde_json::from_str(json).map_err(|source| TunerError::ConfigParse {
        path: path.to_string(),
        source,
    })?;
    file.apply(params);
    Ok(())
}

/// Overlay env-style overrides onto `params`. `lookup` maps a variable name
/// to its value; values that fail to parse are ignored.
pub fn apply_env_overrides(
    params: &mut ModelParams,
    lookup: impl Fn(&str) -> Option<String>,
) {
    if let Some(v) = lookup("COMMTUNE_NET_LAT_US") {
        if let Ok(us) = v.parse::<f64>() {
            params.net_lat_us = us;
        }
    }
    if let Some(v) = lookup("COMMTUNE_INTERNODE_BW_GBS") {
        if let Ok(gbs) = v.parse::<f64>() {
            params.internode_bw = gib_per_s_to_bytes_per_us(gbs);
        }
    }
    if let Some(v) = lookup("COMMTUNE_INTRANODE_BW_GBS") {
        if let Ok(gbs) = v.parse::<f64>() {
            params.intranode_bw = gib_per_s_to_bytes_per_us(gbs);
        }
    }
    if let Some(v) = lookup("COMMTUNE_NUM_CHANNELS") {
        if let Ok(n) = v.parse::<u32>() {
            params.num_channels = n;
        }
    }
}

/// Build the session's model parameters: defaults, then the JSON file named
/// by `COMMTUNE_PARAMS_FILE` (if any), then individual env overrides.
pub fn load_params() -> Result<ModelParams> {
    let mut params = ModelParams::default();

    if let Ok(path) = std::env::var("COMMTUNE_PARAMS_FILE") {
        let json = std::fs::read_to_string(&path).map_err(|source| TunerError::ConfigIo {
            path: path.clone(),
            source,
        })?;
        apply_file_overrides(&mut params, &path, &json)?;
    }

    apply_env_overrides(&mut params, |k| std::env::var(k).ok());

    params
        .validate()
        .map_err(|reason| TunerError::InvalidParams { reason })?;
    Ok(params)
}
