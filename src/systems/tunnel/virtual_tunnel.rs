use bevy::ecs::schedule::ExecutorKind;
use bevy::prelude::*;
use nalgebra::{UnitQuaternion, Vector3};

use crate::components::{
    AirData, AircraftAeroCoefficients, AircraftGeometry, Constraint, ConstraintJoint,
    ControlLimits, ControlPolarity, ControlState, ControlSurface, MassModel, PhysicsComponent,
    Reaction, SpatialComponent,
};
use crate::resources::{
    wind_vector, AircraftControlInterface, ConstraintId, EnvironmentResource, FlowCondition,
    FlowSource, PhysicsConfig, PhysicsEngine, RigError, RigResult, TunnelConfig,
};
use crate::systems::{
    aero_force_system, air_data_system, constraint_reaction_system, force_calculator_system,
    physics_integrator_system,
};

/// A self-contained rigid-body simulation of a model in a wind tunnel.
///
/// Holds its own bevy `World` with a single aircraft entity and steps it with a
/// private schedule, independently of any app the tunnel is embedded in.
pub struct VirtualTunnel {
    world: World,
    schedule: Schedule,
    aircraft: Entity,
    step_count: u64,
    next_constraint: u64,
}

/// Body-local centre of gravity for a position given in percent MAC aft of the leading edge.
pub fn centre_of_gravity(geometry: &AircraftGeometry, mass: &MassModel, percent_mac: f64) -> Vector3<f64> {
    Vector3::new(
        geometry.chord_station(percent_mac / 100.0),
        mass.cg_height,
        0.0,
    )
}

impl VirtualTunnel {
    pub fn new(
        config: &TunnelConfig,
        physics_config: PhysicsConfig,
        environment: EnvironmentResource,
    ) -> Self {
        let mut world = World::new();
        world.insert_resource(physics_config);
        world.insert_resource(environment);

        let centre = centre_of_gravity(&config.geometry, &config.mass, config.cg_percent_mac);
        let physics = PhysicsComponent::new(config.mass.mass, config.mass.inertia, centre);

        let aircraft = world
            .spawn((
                SpatialComponent::default(),
                physics,
                AirData::default(),
                ControlState::default(),
                config.polarity.resolve(),
                config.limits,
                config.geometry,
                config.aero,
                config.mass.clone(),
            ))
            .id();

        let mut schedule = Schedule::default();
        schedule.set_executor_kind(ExecutorKind::SingleThreaded);
        schedule.add_systems(
            (
                air_data_system,
                aero_force_system,
                force_calculator_system,
                constraint_reaction_system,
                physics_integrator_system,
            )
                .chain(),
        );

        info!(
            "Virtual tunnel ready: CG at {:.1}% MAC, density {:.4} kg/m³, timestep {:.4} s",
            config.cg_percent_mac,
            world.resource::<EnvironmentResource>().density,
            world.resource::<PhysicsConfig>().timestep
        );

        Self {
            world,
            schedule,
            aircraft,
            step_count: 0,
            next_constraint: 1,
        }
    }

    /// Sea-level air, default physics.
    pub fn from_config(config: &TunnelConfig) -> Self {
        Self::new(config, PhysicsConfig::default(), EnvironmentResource::default())
    }

    /// Air at the density the sweep will non-dimensionalise with.
    pub fn for_flow(config: &TunnelConfig, flow: &FlowCondition) -> Self {
        Self::new(
            config,
            PhysicsConfig::default(),
            EnvironmentResource::new(flow.density),
        )
    }

    pub fn aircraft(&self) -> Entity {
        self.aircraft
    }

    fn component<T: Component>(&self) -> RigResult<&T> {
        self.world.get::<T>(self.aircraft).ok_or_else(|| {
            RigError::EngineUnavailable(format!(
                "aircraft has no {}",
                std::any::type_name::<T>()
            ))
        })
    }

    fn component_mut<T: Component>(&mut self) -> RigResult<Mut<'_, T>> {
        self.world.get_mut::<T>(self.aircraft).ok_or_else(|| {
            RigError::EngineUnavailable(format!(
                "aircraft has no {}",
                std::any::type_name::<T>()
            ))
        })
    }

    pub fn spatial(&self) -> RigResult<&SpatialComponent> {
        self.component::<SpatialComponent>()
    }

    pub fn controls(&self) -> RigResult<ControlState> {
        self.component::<ControlState>().copied()
    }

    pub fn air_data(&self) -> RigResult<&AirData> {
        self.component::<AirData>()
    }

    pub fn polarity(&self) -> RigResult<ControlPolarity> {
        self.component::<ControlPolarity>().copied()
    }

    pub fn joint(&self) -> Option<&ConstraintJoint> {
        self.world.get::<ConstraintJoint>(self.aircraft)
    }

    pub fn wind(&self) -> Vector3<f64> {
        self.world.resource::<EnvironmentResource>().wind
    }

    pub fn density(&self) -> f64 {
        self.world.resource::<EnvironmentResource>().density
    }

    fn command(&mut self, surface: ControlSurface, degrees: f64) -> RigResult<()> {
        if !degrees.is_finite() {
            return Err(RigError::InvalidParameter(format!(
                "{:?} deflection {}",
                surface, degrees
            )));
        }
        let polarity = *self.component::<ControlPolarity>()?;
        let limits = *self.component::<ControlLimits>()?;
        self.component_mut::<ControlState>()?
            .command(surface, degrees, &polarity, &limits);
        Ok(())
    }
}

impl PhysicsEngine for VirtualTunnel {
    fn is_ready(&self) -> RigResult<()> {
        self.spatial()?;
        self.component::<PhysicsComponent>()?;
        Ok(())
    }

    fn fixed_timestep(&self) -> RigResult<f64> {
        Ok(self.world.resource::<PhysicsConfig>().timestep)
    }

    fn set_fixed_timestep(&mut self, timestep: f64) -> RigResult<()> {
        let timestep = PhysicsConfig::validate_timestep(timestep)
            .map_err(|e| RigError::InvalidParameter(e.to_string()))?;
        self.world.resource_mut::<PhysicsConfig>().timestep = timestep;
        Ok(())
    }

    fn step(&mut self) -> RigResult<()> {
        self.is_ready()?;
        self.schedule.run(&mut self.world);
        self.step_count += 1;
        Ok(())
    }

    fn step_count(&self) -> RigResult<u64> {
        Ok(self.step_count)
    }

    fn centre_of_mass_local(&self) -> RigResult<Vector3<f64>> {
        Ok(self.component::<PhysicsComponent>()?.centre_of_mass)
    }

    fn centre_of_mass_world(&self) -> RigResult<Vector3<f64>> {
        let centre = self.centre_of_mass_local()?;
        Ok(self.spatial()?.body_to_world(&centre))
    }

    fn attitude(&self) -> RigResult<UnitQuaternion<f64>> {
        Ok(self.spatial()?.attitude)
    }

    fn set_attitude(&mut self, attitude: UnitQuaternion<f64>) -> RigResult<()> {
        let centre = self.centre_of_mass_local()?;
        self.component_mut::<SpatialComponent>()?
            .reorient_about(&centre, attitude);
        Ok(())
    }

    fn attach(&mut self, constraint: Constraint) -> RigResult<ConstraintId> {
        if self.joint().is_some() {
            return Err(RigError::InvalidParameter(
                "a constraint is already attached".to_string(),
            ));
        }
        let id = self.next_constraint;
        self.next_constraint += 1;
        self.world
            .entity_mut(self.aircraft)
            .insert(ConstraintJoint::new(id, constraint));
        Ok(ConstraintId(id))
    }

    fn detach(&mut self, id: ConstraintId) -> RigResult<()> {
        match self.joint() {
            Some(joint) if joint.id == id.0 => {
                self.world
                    .entity_mut(self.aircraft)
                    .remove::<ConstraintJoint>();
                Ok(())
            }
            _ => Err(RigError::UnknownConstraint(id.0)),
        }
    }

    fn reaction(&self, id: ConstraintId) -> RigResult<Reaction> {
        match self.joint() {
            Some(joint) if joint.id == id.0 => Ok(joint.reaction),
            _ => Err(RigError::UnknownConstraint(id.0)),
        }
    }
}

impl FlowSource for VirtualTunnel {
    fn set_flow(
        &mut self,
        azimuth_deg: f64,
        elevation_deg: f64,
        speed: f64,
    ) -> RigResult<Vector3<f64>> {
        if !(speed.is_finite() && speed >= 0.0) {
            return Err(RigError::InvalidParameter(format!("flow speed {}", speed)));
        }
        let wind = wind_vector(azimuth_deg, elevation_deg, speed);
        if !wind.iter().all(|w| w.is_finite()) {
            return Err(RigError::NonFinite("wind vector"));
        }
        self.world.resource_mut::<EnvironmentResource>().wind = wind;
        Ok(wind)
    }

    fn speed(&self) -> RigResult<f64> {
        Ok(self.wind().norm())
    }
}

impl AircraftControlInterface for VirtualTunnel {
    fn is_available(&self) -> RigResult<()> {
        self.component::<ControlState>()
            .map(|_| ())
            .map_err(|e| RigError::ControlsUnavailable(e.to_string()))
    }

    fn set_flap_deflection(&mut self, degrees: f64) -> RigResult<()> {
        self.command(ControlSurface::Flap, degrees)
    }

    fn set_elevator_deflection(&mut self, degrees: f64) -> RigResult<()> {
        self.command(ControlSurface::Elevator, degrees)
    }

    fn set_aileron_deflection(&mut self, degrees: f64) -> RigResult<()> {
        self.command(ControlSurface::Aileron, degrees)
    }

    fn set_cg_offset(&mut self, percent_mac: f64) -> RigResult<()> {
        if !percent_mac.is_finite() {
            return Err(RigError::InvalidParameter(format!(
                "CG offset {}",
                percent_mac
            )));
        }
        let geometry = *self.component::<AircraftGeometry>()?;
        let centre = centre_of_gravity(&geometry, self.component::<MassModel>()?, percent_mac);
        self.component_mut::<PhysicsComponent>()?.centre_of_mass = centre;
        Ok(())
    }
}
