use bevy::prelude::*;

use super::header::build_header;
use crate::components::{
    CoefficientRow, ConstraintMode, Header, SecondaryVariable, SweepPhase, SweepSpecification,
    SweepStatus,
};
use crate::resources::{
    AircraftControlInterface, DataSink, FlowSource, PhysicsEngine, Result, RigError,
    SweepError, SweepSettings,
};
use crate::systems::{AeroCoefficients, ForceBalance};

/// One output stream: a sweep specification and the sink its rows go to.
pub struct SweepRun<D: DataSink> {
    pub specification: SweepSpecification,
    pub sink: D,
}

impl<D: DataSink> SweepRun<D> {
    pub fn new(specification: SweepSpecification, sink: D) -> Self {
        Self {
            specification,
            sink,
        }
    }
}

enum Transition {
    Continue,
    Suspend,
    Finished,
}

/// Drives nested parameter sweeps against a stepped physics engine.
///
/// The controller never advances the physics itself, apart from the single step a
/// tare takes. Each call to [`SweepController::step`] runs transitions until the
/// next point that needs the physics to settle and returns
/// [`SweepStatus::Settling`]; the caller integrates one fixed step before calling
/// again. A call made before that step has happened does nothing.
pub struct SweepController<E, F, A, D>
where
    E: PhysicsEngine,
    F: FlowSource,
    A: AircraftControlInterface,
    D: DataSink,
{
    balance: ForceBalance<E>,
    flow: F,
    controls: A,
    settings: SweepSettings,
    runs: Vec<SweepRun<D>>,
    headers: Vec<Header>,
    phase: SweepPhase,
    run: usize,
    primary: usize,
    row: Option<CoefficientRow>,
    dynamic_pressure: f64,
    waiting_on: Option<u64>,
    original_timestep: Option<f64>,
    cancel_requested: bool,
    rows_emitted: usize,
}

impl<E, F, A, D> SweepController<E, F, A, D>
where
    E: PhysicsEngine,
    F: FlowSource,
    A: AircraftControlInterface,
    D: DataSink,
{
    pub fn new(
        balance: ForceBalance<E>,
        flow: F,
        controls: A,
        settings: SweepSettings,
        runs: Vec<SweepRun<D>>,
    ) -> Result<Self> {
        settings.validate()?;
        let headers = runs
            .iter()
            .map(|run| build_header(&run.specification))
            .collect();

        Ok(Self {
            balance,
            flow,
            controls,
            settings,
            runs,
            headers,
            phase: SweepPhase::Idle,
            run: 0,
            primary: 0,
            row: None,
            dynamic_pressure: 0.0,
            waiting_on: None,
            original_timestep: None,
            cancel_requested: false,
            rows_emitted: 0,
        })
    }

    pub fn phase(&self) -> SweepPhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase.is_terminal()
    }

    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    pub fn rows_emitted(&self) -> usize {
        self.rows_emitted
    }

    /// Index of the current run and primary step
    pub fn progress(&self) -> (usize, usize) {
        (self.run, self.primary)
    }

    pub fn balance(&self) -> &ForceBalance<E> {
        &self.balance
    }

    pub fn balance_mut(&mut self) -> &mut ForceBalance<E> {
        &mut self.balance
    }

    pub fn settings(&self) -> &SweepSettings {
        &self.settings
    }

    pub fn flow(&self) -> &F {
        &self.flow
    }

    pub fn controls(&self) -> &A {
        &self.controls
    }

    /// Stop at the next call to [`SweepController::step`]. Rows already written are
    /// kept; the row being filled is discarded.
    pub fn cancel(&mut self) {
        if !self.phase.is_terminal() {
            info!("Sweep cancellation requested");
            self.cancel_requested = true;
        }
    }

    /// Check the collaborators, lower the timestep, mount the model and open the
    /// first stream. Nothing is written if a collaborator is unusable.
    pub fn start(&mut self) -> Result<()> {
        match self.phase {
            SweepPhase::Idle => self.guarded(Self::begin),
            phase if phase.is_terminal() => Err(SweepError::AlreadyFinished),
            _ => Ok(()),
        }
    }

    fn begin(&mut self) -> Result<()> {
        self.balance.engine().is_ready()?;
        self.controls.is_available()?;
        self.flow.speed()?;

        if self.runs.is_empty() {
            warn!("Sweep has no runs");
            self.phase = SweepPhase::Done;
            return Ok(());
        }

        let timestep = self.balance.engine().fixed_timestep()?;
        self.balance
            .engine_mut()
            .set_fixed_timestep(self.settings.sweep_timestep())?;
        self.original_timestep = Some(timestep);

        self.balance.mount_mut().set_mode(ConstraintMode::Fixed)?;
        self.open_run(0)?;
        Ok(())
    }

    fn open_run(&mut self, run: usize) -> Result<()> {
        self.run = run;
        self.primary = 0;
        let header = &self.headers[run];
        self.runs[run].sink.begin(header)?;
        info!(
            "Starting {} sweep {}/{}: {} points, {} columns",
            header.primary,
            run + 1,
            self.runs.len(),
            self.runs[run].specification.primary.len(),
            header.columns.len()
        );
        self.phase = SweepPhase::SetPose;
        Ok(())
    }

    /// Advance to the next suspension point.
    pub fn step(&mut self) -> Result<SweepStatus> {
        match self.phase {
            SweepPhase::Done => return Ok(SweepStatus::Done),
            SweepPhase::Cancelled => return Ok(SweepStatus::Cancelled),
            SweepPhase::Aborted => return Err(SweepError::AlreadyFinished),
            _ => {}
        }

        if self.cancel_requested {
            self.finish_cancelled();
            return Ok(SweepStatus::Cancelled);
        }

        if self.phase == SweepPhase::Idle {
            self.start()?;
        }

        if let Some(mark) = self.waiting_on {
            let now = self.guarded(|c| Ok(c.balance.engine().step_count()?))?;
            if now == mark {
                return Ok(SweepStatus::Settling);
            }
            self.waiting_on = None;
        }

        self.guarded(Self::advance)
    }

    /// Run the sweep to the end, stepping the engine whenever the controller waits.
    pub fn run_to_completion(&mut self) -> Result<SweepStatus> {
        loop {
            match self.step()? {
                SweepStatus::Settling => {
                    self.guarded(|c| Ok(c.balance.engine_mut().step()?))?;
                }
                status => return Ok(status),
            }
        }
    }

    fn advance(&mut self) -> Result<SweepStatus> {
        loop {
            if self.phase.is_terminal() {
                return Ok(SweepStatus::Done);
            }
            match self.transition()? {
                Transition::Continue => {}
                Transition::Suspend => {
                    self.waiting_on = Some(self.balance.engine().step_count()?);
                    return Ok(SweepStatus::Settling);
                }
                Transition::Finished => return Ok(SweepStatus::Done),
            }
        }
    }

    fn specification(&self) -> &SweepSpecification {
        &self.runs[self.run].specification
    }

    fn transition(&mut self) -> Result<Transition> {
        match self.phase {
            SweepPhase::SetPose => {
                let specification = self.specification();
                let value = specification.primary.values()[self.primary];
                let pose = specification.primary.variable.pose(value);
                info!(
                    "{} step {}/{} at {:.2} deg",
                    specification.primary.variable.label(),
                    self.primary + 1,
                    specification.primary.len(),
                    value
                );

                self.balance
                    .mount_mut()
                    .reconfigure(|engine| engine.set_attitude(pose.rotation()))?;
                self.row = Some(CoefficientRow::new(value));
                self.phase = SweepPhase::Detare;
                Ok(Transition::Continue)
            }
            SweepPhase::Detare => {
                self.balance.clear_tare();
                self.phase = SweepPhase::ApplyZeroFlow;
                Ok(Transition::Continue)
            }
            SweepPhase::ApplyZeroFlow => {
                let flow = self.settings.flow;
                self.flow
                    .set_flow(flow.azimuth_deg, flow.elevation_deg, 0.0)?;
                self.phase = SweepPhase::SettleTare;
                Ok(Transition::Suspend)
            }
            SweepPhase::SettleTare => {
                self.balance.tare(&self.flow)?;
                self.phase = SweepPhase::ApplyTestFlow;
                Ok(Transition::Continue)
            }
            SweepPhase::ApplyTestFlow => {
                let flow = self.settings.flow;
                self.flow
                    .set_flow(flow.azimuth_deg, flow.elevation_deg, flow.speed)?;
                self.dynamic_pressure = flow.dynamic_pressure();
                self.phase = SweepPhase::SetTrim;
                Ok(Transition::Continue)
            }
            SweepPhase::SetTrim => {
                let trims: Vec<(SecondaryVariable, f64)> = self
                    .specification()
                    .secondaries
                    .iter()
                    .filter_map(|sweep| sweep.trim().map(|trim| (sweep.variable, trim)))
                    .collect();
                for (variable, trim) in trims {
                    self.apply_secondary(variable, trim)?;
                }
                self.phase = self.next_secondary(None);
                Ok(Transition::Continue)
            }
            SweepPhase::SecondaryApply { sweep, index } => {
                let secondary = &self.specification().secondaries[sweep];
                let (variable, value) = (secondary.variable, secondary.values[index]);
                self.apply_secondary(variable, value)?;
                self.phase = SweepPhase::SecondaryMeasure { sweep, index };
                Ok(Transition::Suspend)
            }
            SweepPhase::SecondaryMeasure { sweep, index } => {
                self.measure(sweep, index)?;
                let count = self.specification().secondaries[sweep].values.len();
                self.phase = if index + 1 < count {
                    SweepPhase::SecondaryApply {
                        sweep,
                        index: index + 1,
                    }
                } else {
                    SweepPhase::RevertTrim { sweep }
                };
                Ok(Transition::Continue)
            }
            SweepPhase::RevertTrim { sweep } => {
                let secondary = &self.specification().secondaries[sweep];
                let variable = secondary.variable;
                if let Some(trim) = secondary.trim() {
                    self.apply_secondary(variable, trim)?;
                }
                self.phase = self.next_secondary(Some(sweep));
                Ok(Transition::Continue)
            }
            SweepPhase::EmitRow => {
                if let Some(row) = self.row.take() {
                    self.runs[self.run].sink.append(&row)?;
                    self.rows_emitted += 1;
                }
                self.phase = SweepPhase::NextPrimaryStep;
                Ok(Transition::Continue)
            }
            SweepPhase::NextPrimaryStep => {
                self.primary += 1;
                self.phase = if self.primary < self.specification().primary.len() {
                    SweepPhase::SetPose
                } else {
                    SweepPhase::NextRun
                };
                Ok(Transition::Continue)
            }
            SweepPhase::NextRun => {
                self.runs[self.run].sink.finish()?;
                info!("Finished {} sweep", self.headers[self.run].primary);
                if self.run + 1 < self.runs.len() {
                    self.open_run(self.run + 1)?;
                    Ok(Transition::Continue)
                } else {
                    self.restore_timestep();
                    self.phase = SweepPhase::Done;
                    info!("Sweep complete, {} rows written", self.rows_emitted);
                    Ok(Transition::Finished)
                }
            }
            SweepPhase::Idle
            | SweepPhase::Done
            | SweepPhase::Cancelled
            | SweepPhase::Aborted => Ok(Transition::Finished),
        }
    }

    /// First active secondary sweep after `after`, or the row is complete.
    fn next_secondary(&self, after: Option<usize>) -> SweepPhase {
        let start = after.map_or(0, |s| s + 1);
        self.specification()
            .secondaries
            .iter()
            .enumerate()
            .skip(start)
            .find(|(_, sweep)| !sweep.is_empty())
            .map_or(SweepPhase::EmitRow, |(sweep, _)| SweepPhase::SecondaryApply {
                sweep,
                index: 0,
            })
    }

    fn apply_secondary(&mut self, variable: SecondaryVariable, value: f64) -> Result<()> {
        match variable {
            SecondaryVariable::Flap => self.controls.set_flap_deflection(value)?,
            SecondaryVariable::Elevator => self.controls.set_elevator_deflection(value)?,
            SecondaryVariable::Aileron => self.controls.set_aileron_deflection(value)?,
            SecondaryVariable::CgPosition => {
                let controls = &mut self.controls;
                self.balance
                    .mount_mut()
                    .reconfigure(|_| controls.set_cg_offset(value))?;
            }
        }
        Ok(())
    }

    fn measure(&mut self, sweep: usize, index: usize) -> Result<()> {
        let non_finite = |quantity| SweepError::NonFinite {
            quantity,
            run: self.run,
            primary: self.primary,
            sweep,
            index,
        };

        let force = self.balance.read_force()?;
        let torque = self.balance.read_torque()?;
        let reference = &self.settings.reference;
        let coefficients = AeroCoefficients::from_reading(
            &force,
            &torque,
            self.dynamic_pressure,
            reference.wing_area,
            reference.mac,
        )
        .map_err(|e| match e {
            RigError::NonFinite(quantity) => non_finite(quantity),
            RigError::ZeroDynamicPressure(dynamic_pressure) => SweepError::DynamicPressure {
                dynamic_pressure,
                run: self.run,
                primary: self.primary,
                sweep,
                index,
            },
            other => other.into(),
        })?;

        let values: Vec<f64> = self.specification().secondaries[sweep]
            .outputs
            .iter()
            .map(|kind| kind.select(&coefficients))
            .collect();
        if values.iter().any(|v| !v.is_finite()) {
            return Err(non_finite("coefficient"));
        }

        debug!(
            "{} = {:.2}: {:?}",
            self.specification().secondaries[sweep].variable.label(),
            self.specification().secondaries[sweep].values[index],
            values
        );
        if let Some(row) = self.row.as_mut() {
            row.values.extend(values);
        }
        Ok(())
    }

    /// Run `f`, aborting the sweep if it fails.
    fn guarded<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        f(self).map_err(|e| {
            self.abort(&e);
            e
        })
    }

    fn abort(&mut self, error: &SweepError) {
        error!(
            "Sweep aborted at run {}, primary step {}: {}",
            self.run, self.primary, error
        );
        self.row = None;
        self.waiting_on = None;
        self.close_sink();
        self.restore_timestep();
        self.phase = SweepPhase::Aborted;
    }

    fn finish_cancelled(&mut self) {
        info!(
            "Sweep cancelled after {} rows, discarding the partial row",
            self.rows_emitted
        );
        self.row = None;
        self.waiting_on = None;
        self.close_sink();
        self.restore_timestep();
        self.phase = SweepPhase::Cancelled;
    }

    fn close_sink(&mut self) {
        if self.phase == SweepPhase::Idle {
            return;
        }
        if let Some(run) = self.runs.get_mut(self.run) {
            if let Err(e) = run.sink.finish() {
                warn!("Failed to close sweep output: {}", e);
            }
        }
    }

    fn restore_timestep(&mut self) {
        if let Some(timestep) = self.original_timestep.take() {
            if let Err(e) = self.balance.engine_mut().set_fixed_timestep(timestep) {
                error!("Failed to restore physics timestep {}: {}", timestep, e);
            }
        }
    }
}

impl<E, F, A, D> Drop for SweepController<E, F, A, D>
where
    E: PhysicsEngine,
    F: FlowSource,
    A: AircraftControlInterface,
    D: DataSink,
{
    fn drop(&mut self) {
        self.restore_timestep();
    }
}
