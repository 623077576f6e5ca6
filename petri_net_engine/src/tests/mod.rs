mod firing_scenarios;
