use super::{error::BuildError, SetConfig};

pub(crate) fn validate(config: &SetConfig) -> Result<(), BuildError> {
    if config.initial_capacity == 0 {
        return Err(BuildError::ZeroInitialCapacity);
    }
    if config.probe_size == 0 {
        return Err(BuildError::ZeroProbeSize);
    }
    if config.probe_threshold == 0 || config.probe_threshold >= config.probe_size {
        return Err(BuildError::InvalidProbeThreshold {
            threshold: config.probe_threshold,
            probe_size: config.probe_size,
        });
    }
    if config.lock_stripes == 0 {
        return Err(BuildError::ZeroLockStripes);
    }
    Ok(())
}
