//! Negative tests - every way a registry can be rejected after loading

use initgen_registry::{Capability, ComponentId, Phase, RegistryError};
use initgen_schedule::{schedule, ScheduleError};
use initgen_test_utils::{load, ComponentDef};
use pretty_assertions::assert_eq;

fn ids(list: &[ComponentId]) -> Vec<&str> {
    list.iter().map(ComponentId::as_str).collect()
}

#[test]
fn test_rejects_direct_self_dependency() {
    let registry = load([ComponentDef::global("a", "cpp_init").depends_on(&["a"])]);
    let err = schedule(&registry).unwrap_err();
    assert!(err.is_cycle());
    assert_eq!(err.component(), Some(&ComponentId::new("a")));
}

#[test]
fn test_rejects_transitive_cycle_through_capabilities() {
    let registry = load([
        ComponentDef::global("a", "memory_management")
            .provides(&["pages"])
            .depends_on_capabilities(&["heap"]),
        ComponentDef::global("b", "memory_management")
            .provides(&["heap"])
            .depends_on(&["a"]),
    ]);
    let err = schedule(&registry).unwrap_err();
    let ScheduleError::DependencyCycle { phase, cycle, .. } = err else {
        panic!("expected a cycle, got {err:?}");
    };
    assert_eq!(phase, Phase::MemoryManagement);
    assert_eq!(ids(&cycle), ["a", "b"]);
}

#[test]
fn test_rejects_self_capability_dependency() {
    let registry = load([ComponentDef::global("a", "cpp_init")
        .provides(&["x"])
        .depends_on_capabilities(&["x"])]);
    assert!(schedule(&registry).unwrap_err().is_cycle());
}

#[test]
fn test_cycle_in_later_phase_is_reported_with_its_phase() {
    let registry = load([
        ComponentDef::global("ok", "cpp_init"),
        ComponentDef::global("x", "smp_bringup").depends_on(&["y"]),
        ComponentDef::global("y", "smp_bringup").depends_on(&["x"]),
    ]);
    let err = schedule(&registry).unwrap_err();
    assert!(matches!(
        err,
        ScheduleError::DependencyCycle {
            phase: Phase::SmpBringup,
            ..
        }
    ));
    assert!(err.to_string().contains("smp_bringup"));
}

#[test]
fn test_rejects_capability_provided_after_first_use() {
    let registry = load([
        ComponentDef::global("consumer", "processor_early").depends_on_capabilities(&["acpi"]),
        ComponentDef::global("provider", "smp_bringup").provides(&["acpi"]),
    ]);
    assert_eq!(
        schedule(&registry).unwrap_err(),
        ScheduleError::CapabilityOrdering {
            capability: Capability::new("acpi"),
            provider: ComponentId::new("provider"),
            provider_phase: Phase::SmpBringup,
            consumer: ComponentId::new("consumer"),
            consumer_phase: Phase::ProcessorEarly,
        }
    );
}

#[test]
fn test_capability_ordering_is_checked_before_cycles() {
    let registry = load([
        ComponentDef::global("a", "cpp_init").depends_on(&["a"]),
        ComponentDef::global("consumer", "cpp_init").depends_on_capabilities(&["late"]),
        ComponentDef::global("provider", "core_devices").provides(&["late"]),
    ]);
    assert!(matches!(
        schedule(&registry),
        Err(ScheduleError::CapabilityOrdering { .. })
    ));
}

#[test]
fn test_rejects_unknown_explicit_dependency() {
    let registry = load([ComponentDef::global("a", "cpp_init").depends_on(&["ghost"])]);
    assert_eq!(
        schedule(&registry).unwrap_err(),
        ScheduleError::UnknownDependency {
            component: ComponentId::new("a"),
            dependency: ComponentId::new("ghost"),
        }
    );
}

#[test]
fn test_rejects_explicit_dependency_across_phases() {
    let registry = load([
        ComponentDef::global("a", "cpp_init"),
        ComponentDef::global("b", "core_devices").depends_on(&["a"]),
    ]);
    assert_eq!(
        schedule(&registry).unwrap_err(),
        ScheduleError::CrossPhaseDependency {
            component: ComponentId::new("b"),
            phase: Phase::CoreDevices,
            dependency: ComponentId::new("a"),
            dependency_phase: Phase::CppInit,
        }
    );
}

#[test]
fn test_rejects_required_component_with_unprovided_capability() {
    let registry = load([ComponentDef::global("a", "cpp_init")
        .required()
        .depends_on_capabilities(&["nothing"])]);
    assert_eq!(
        schedule(&registry).unwrap_err(),
        ScheduleError::MissingRequiredCapability {
            component: ComponentId::new("a"),
            capability: Capability::new("nothing"),
        }
    );
}

#[test]
fn test_rejects_ap_dependency_provided_in_smp_bringup() {
    let registry = load([
        ComponentDef::global("ipi", "smp_bringup").provides(&["ipi"]),
        ComponentDef::per_cpu("tlb", "smp_bringup").ap_depends_on_capabilities(&["ipi"]),
    ]);
    assert_eq!(
        schedule(&registry).unwrap_err(),
        ScheduleError::UnsatisfiedApDependency {
            component: ComponentId::new("tlb"),
            capability: Capability::new("ipi"),
        }
    );
}

#[test]
fn test_rejects_ap_dependency_on_unprovided_capability() {
    let registry = load([
        ComponentDef::per_cpu("tlb", "smp_bringup").ap_depends_on_capabilities(&["ghost"]),
    ]);
    assert!(matches!(
        schedule(&registry),
        Err(ScheduleError::UnsatisfiedApDependency { .. })
    ));
}

#[test]
fn test_rejects_logical_cpu_id_twice() {
    let registry = load([
        ComponentDef::per_cpu("lapic", "processor_early").provides(&["logical_cpu_id"]),
        ComponentDef::per_cpu("x2apic", "core_devices").provides(&["logical_cpu_id"]),
    ]);
    let err = schedule(&registry).unwrap_err();
    assert_eq!(
        err,
        ScheduleError::Registry(RegistryError::NonUniqueCapability {
            capability: Capability::new("logical_cpu_id"),
            first: ComponentId::new("lapic"),
            second: ComponentId::new("x2apic"),
        })
    );
    assert_eq!(err.component(), Some(&ComponentId::new("x2apic")));
}
