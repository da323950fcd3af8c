use crate::model::seird::SeirdParams;

/// Basic reproduction number of the SEIRD system.
/// R0 = beta / ((1-alpha)·k + alpha·rho); incubation does not change it.
pub fn basic_reproduction_number(params: &SeirdParams) -> f64 {
    let exit = (1.0 - params.alpha) * params.k + params.alpha * params.rho;
    params.beta / exit
}
